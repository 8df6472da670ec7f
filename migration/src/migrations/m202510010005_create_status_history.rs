use sea_orm_migration::prelude::*;

use super::m202510010004_create_repair_tickets::status_values;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202510010005_create_status_history"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("status_history"))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alias::new("id"))
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Alias::new("ticket_id")).big_integer().not_null())
                    .col(
                        ColumnDef::new(Alias::new("old_status"))
                            .enumeration(Alias::new("ticket_status"), status_values()),
                    )
                    .col(
                        ColumnDef::new(Alias::new("new_status"))
                            .enumeration(Alias::new("ticket_status"), status_values())
                            .not_null(),
                    )
                    .col(ColumnDef::new(Alias::new("changed_by")).big_integer())
                    .col(ColumnDef::new(Alias::new("comment")).text())
                    .col(
                        ColumnDef::new(Alias::new("changed_at"))
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("status_history"), Alias::new("ticket_id"))
                            .to(Alias::new("repair_tickets"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("status_history"), Alias::new("changed_by"))
                            .to(Alias::new("users"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_status_history_ticket")
                    .table(Alias::new("status_history"))
                    .col(Alias::new("ticket_id"))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("status_history")).to_owned())
            .await
    }
}
