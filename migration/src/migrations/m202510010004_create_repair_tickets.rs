use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202510010004_create_repair_tickets"
    }
}

pub(crate) fn status_values() -> Vec<Alias> {
    [
        "accepted",
        "diagnostics",
        "awaiting_parts",
        "in_repair",
        "testing",
        "ready_for_pickup",
        "delivered",
    ]
    .into_iter()
    .map(Alias::new)
    .collect()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("repair_tickets"))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alias::new("id"))
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Alias::new("code")).string_len(20).not_null().unique_key())
                    .col(ColumnDef::new(Alias::new("client_id")).big_integer().not_null())
                    .col(ColumnDef::new(Alias::new("device_type")).string().not_null())
                    .col(ColumnDef::new(Alias::new("brand")).string())
                    .col(ColumnDef::new(Alias::new("model")).string())
                    .col(ColumnDef::new(Alias::new("serial_number")).string())
                    .col(ColumnDef::new(Alias::new("problem_description")).text().not_null())
                    .col(
                        ColumnDef::new(Alias::new("status"))
                            .enumeration(Alias::new("ticket_status"), status_values())
                            .not_null()
                            .default("accepted"),
                    )
                    .col(
                        ColumnDef::new(Alias::new("priority"))
                            .enumeration(
                                Alias::new("ticket_priority"),
                                vec![
                                    Alias::new("low"),
                                    Alias::new("normal"),
                                    Alias::new("high"),
                                    Alias::new("critical"),
                                ],
                            )
                            .not_null()
                            .default("normal"),
                    )
                    .col(ColumnDef::new(Alias::new("estimated_cost")).double())
                    .col(ColumnDef::new(Alias::new("final_cost")).double())
                    .col(ColumnDef::new(Alias::new("estimated_completion")).date())
                    .col(ColumnDef::new(Alias::new("actual_completion")).date())
                    .col(ColumnDef::new(Alias::new("assigned_technician_id")).big_integer())
                    .col(ColumnDef::new(Alias::new("assigned_by_id")).big_integer())
                    .col(ColumnDef::new(Alias::new("assigned_at")).timestamp_with_time_zone())
                    .col(ColumnDef::new(Alias::new("created_by_id")).big_integer())
                    .col(
                        ColumnDef::new(Alias::new("is_archived"))
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Alias::new("warranty_days"))
                            .integer()
                            .not_null()
                            .default(30),
                    )
                    .col(ColumnDef::new(Alias::new("notes")).text())
                    .col(
                        ColumnDef::new(Alias::new("created_at"))
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .col(
                        ColumnDef::new(Alias::new("updated_at"))
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("repair_tickets"), Alias::new("client_id"))
                            .to(Alias::new("clients"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("repair_tickets"), Alias::new("assigned_technician_id"))
                            .to(Alias::new("users"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("repair_tickets"), Alias::new("assigned_by_id"))
                            .to(Alias::new("users"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("repair_tickets"), Alias::new("created_by_id"))
                            .to(Alias::new("users"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("idx_repair_tickets_status", "status"),
            ("idx_repair_tickets_created_at", "created_at"),
            ("idx_repair_tickets_client_id", "client_id"),
            ("idx_repair_tickets_technician", "assigned_technician_id"),
        ] {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(name)
                        .table(Alias::new("repair_tickets"))
                        .col(Alias::new(column))
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("repair_tickets")).to_owned())
            .await
    }
}
