use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, Set};
use serde::Serialize;

use super::repair_ticket::TicketStatus;

/// One status change of a ticket. Rows are only ever inserted.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "status_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub ticket_id: i64,
    /// `None` for the entry written when the ticket is created.
    pub old_status: Option<TicketStatus>,
    pub new_status: TicketStatus,
    pub changed_by: Option<i64>,
    pub comment: Option<String>,
    pub changed_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::repair_ticket::Entity",
        from = "Column::TicketId",
        to = "super::repair_ticket::Column::Id"
    )]
    Ticket,
}

impl Related<super::repair_ticket::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ticket.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn append<C: ConnectionTrait>(
        db: &C,
        ticket_id: i64,
        old_status: Option<TicketStatus>,
        new_status: TicketStatus,
        changed_by: Option<i64>,
        comment: Option<String>,
    ) -> Result<Model, DbErr> {
        ActiveModel {
            ticket_id: Set(ticket_id),
            old_status: Set(old_status),
            new_status: Set(new_status),
            changed_by: Set(changed_by),
            comment: Set(comment.filter(|c| !c.trim().is_empty())),
            changed_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    /// Full trail of a ticket, oldest first.
    pub async fn for_ticket<C: ConnectionTrait>(db: &C, ticket_id: i64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::TicketId.eq(ticket_id))
            .order_by_asc(Column::ChangedAt)
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }

    pub async fn count_for_ticket<C: ConnectionTrait>(db: &C, ticket_id: i64) -> Result<u64, DbErr> {
        Entity::find()
            .filter(Column::TicketId.eq(ticket_id))
            .count(db)
            .await
    }

    /// Entries into `status` since `since` on the given tickets.
    pub async fn count_entries_into<C: ConnectionTrait>(
        db: &C,
        ticket_ids: &[i64],
        status: TicketStatus,
        since: DateTime<Utc>,
    ) -> Result<u64, DbErr> {
        if ticket_ids.is_empty() {
            return Ok(0);
        }
        Entity::find()
            .filter(Column::TicketId.is_in(ticket_ids.iter().copied()))
            .filter(Column::NewStatus.eq(status))
            .filter(Column::ChangedAt.gte(since))
            .count(db)
            .await
    }
}
