use colored::*;
use migration::Migrator;
use sea_orm_migration::prelude::*;
use std::io::{self, Write};
use std::time::Instant;

const STATUS_COLUMN: usize = 80;

/// Applies pending migrations one at a time, printing a status line for each.
///
/// Every step goes through the migrator so it is recorded in `seaql_migrations`
/// and the API's startup check sees an up-to-date schema.
pub async fn run_pending_migrations(url: &str) -> Result<(), DbErr> {
    let db = sea_orm::Database::connect(url).await?;

    let pending = Migrator::get_pending_migrations(&db).await?;
    if pending.is_empty() {
        println!("{}", "Schema is up to date".green());
        return Ok(());
    }

    println!("Running {} migration(s)...", pending.len());
    for migration in pending {
        let name_str = format!("Applying {}", migration.name().bold());
        let dots = ".".repeat(STATUS_COLUMN.saturating_sub(name_str.len()));
        print!("{}{} ", name_str, dots);
        io::stdout().flush().ok();

        let start = Instant::now();
        if let Err(e) = Migrator::up(&db, Some(1)).await {
            println!("{}", "failed".red());
            return Err(e);
        }
        let time_str = format!("({:.2?})", start.elapsed()).dimmed();
        println!("{} {}", "done".green(), time_str);
    }

    Ok(())
}
