use crate::seed::Seeder;
use db::models::client::Model as ClientModel;
use db::models::repair_ticket::{TicketPriority, TicketStatus};
use db::models::user::{Model as UserModel, Role, UserFilter};
use db::workflow::{self, ClientRef, NewTicket, WorkflowError};
use sea_orm::{DatabaseConnection, DbErr};

pub struct TicketSeeder;

const DEVICES: &[(&str, &str, &str)] = &[
    ("Laptop", "Lenovo", "ThinkPad T14"),
    ("Laptop", "Asus", "VivoBook 15"),
    ("Phone", "Samsung", "Galaxy A54"),
    ("Phone", "Apple", "iPhone 12"),
    ("Tablet", "Apple", "iPad Air"),
    ("Console", "Sony", "PlayStation 5"),
];

const PROBLEMS: &[&str] = &[
    "Does not power on",
    "Cracked screen",
    "Battery drains within an hour",
    "Overheats and shuts down",
    "No sound from speakers",
    "Charging port loose",
];

const PRIORITIES: &[TicketPriority] = &[
    TicketPriority::Low,
    TicketPriority::Normal,
    TicketPriority::Normal,
    TicketPriority::High,
    TicketPriority::Critical,
];

fn into_db(e: WorkflowError) -> DbErr {
    match e {
        WorkflowError::Db(e) => e,
        other => DbErr::Custom(other.to_string()),
    }
}

#[async_trait::async_trait]
impl Seeder for TicketSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        let clients = ClientModel::search(db, None).await?;
        let masters = UserModel::list(
            db,
            UserFilter {
                role: Some(Role::Master),
                is_active: Some(true),
                ..Default::default()
            },
        )
        .await?;
        let Some(manager) = UserModel::get_by_username(db, "manager").await? else {
            return Ok(());
        };
        if clients.is_empty() {
            return Ok(());
        }

        for _ in 0..40 {
            let client = &clients[fastrand::usize(..clients.len())];
            let (device_type, brand, model) = DEVICES[fastrand::usize(..DEVICES.len())];

            let ticket = workflow::create_ticket(
                db,
                NewTicket {
                    client: ClientRef::Existing(client.id),
                    device_type: device_type.to_string(),
                    brand: Some(brand.to_string()),
                    model: Some(model.to_string()),
                    serial_number: Some(format!("SN{:08}", fastrand::u32(..100_000_000))),
                    problem_description: PROBLEMS[fastrand::usize(..PROBLEMS.len())].to_string(),
                    priority: PRIORITIES[fastrand::usize(..PRIORITIES.len())],
                    estimated_cost: Some(fastrand::u32(20..400) as f64),
                    estimated_completion: None,
                    warranty_days: Some(90),
                    notes: None,
                },
                Some(manager.id),
            )
            .await
            .map_err(into_db)?;

            if masters.is_empty() || fastrand::u8(..4) == 0 {
                continue;
            }
            let master = &masters[fastrand::usize(..masters.len())];
            workflow::assign(db, ticket.id, master.id, manager.id)
                .await
                .map_err(into_db)?;

            // Walk the ticket some way along the usual path
            let steps = fastrand::usize(..TicketStatus::ALL.len());
            for status in TicketStatus::ALL.iter().skip(1).take(steps) {
                workflow::transition(db, ticket.id, *status, master.id, None)
                    .await
                    .map_err(into_db)?;
            }
        }
        Ok(())
    }
}
