use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m202510010001_create_users::Migration),
            Box::new(migrations::m202510010002_create_technician_skills::Migration),
            Box::new(migrations::m202510010003_create_clients::Migration),
            Box::new(migrations::m202510010004_create_repair_tickets::Migration),
            Box::new(migrations::m202510010005_create_status_history::Migration),
            Box::new(migrations::m202510010006_create_assignment_entries::Migration),
        ]
    }
}
