pub mod bootstrap;
pub mod models;
pub mod statistics;
pub mod test_utils;
pub mod workflow;

use sea_orm::{Database, DatabaseConnection};
use std::path::Path;
use util::config;

/// Opens the database named by `DATABASE_PATH`.
///
/// A value starting with `sqlite:` is used as a DSN verbatim; anything else is
/// treated as a SQLite file path.
pub async fn connect() -> DatabaseConnection {
    let path_or_url = config::database_path();
    let url = if path_or_url.starts_with("sqlite:") {
        path_or_url
    } else {
        // SQLite won't create intermediate dirs.
        if let Some(parent) = Path::new(&path_or_url).parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        format!("sqlite://{path_or_url}?mode=rwc")
    };

    Database::connect(&url)
        .await
        .expect("Failed to connect to database")
}
