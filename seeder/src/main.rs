use crate::seed::run_seeder;
use crate::seeds::{client::ClientSeeder, staff::StaffSeeder, ticket::TicketSeeder};
use migration::{Migrator, MigratorTrait};

mod seed;
mod seeds;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let db = db::connect().await;

    if let Err(e) = Migrator::up(&db, None).await {
        eprintln!("Failed to apply migrations: {e}");
        std::process::exit(1);
    }

    run_seeder(&StaffSeeder, "Staff", &db).await;
    run_seeder(&ClientSeeder, "Client", &db).await;
    run_seeder(&TicketSeeder, "Ticket", &db).await;
}
