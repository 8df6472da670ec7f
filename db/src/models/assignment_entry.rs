use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, Set};
use serde::Serialize;

/// Ledger row recording that a technician held a ticket for a period.
///
/// An entry with `unassigned_at == None` is the ticket's open assignment; the
/// store allows at most one per ticket.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "assignment_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub ticket_id: i64,
    pub technician_id: i64,
    pub assigned_by: Option<i64>,
    pub assigned_at: DateTime<Utc>,
    pub unassigned_at: Option<DateTime<Utc>>,
    pub reason: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::repair_ticket::Entity",
        from = "Column::TicketId",
        to = "super::repair_ticket::Column::Id"
    )]
    Ticket,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::TechnicianId",
        to = "super::user::Column::Id"
    )]
    Technician,
}

impl Related<super::repair_ticket::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ticket.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Technician.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn open<C: ConnectionTrait>(
        db: &C,
        ticket_id: i64,
        technician_id: i64,
        assigned_by: Option<i64>,
        at: DateTime<Utc>,
    ) -> Result<Model, DbErr> {
        ActiveModel {
            ticket_id: Set(ticket_id),
            technician_id: Set(technician_id),
            assigned_by: Set(assigned_by),
            assigned_at: Set(at),
            unassigned_at: Set(None),
            reason: Set(None),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn current<C: ConnectionTrait>(db: &C, ticket_id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::TicketId.eq(ticket_id))
            .filter(Column::UnassignedAt.is_null())
            .one(db)
            .await
    }

    /// Closes the open entry of a ticket, if there is one.
    pub async fn close_open<C: ConnectionTrait>(
        db: &C,
        ticket_id: i64,
        reason: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<Option<Model>, DbErr> {
        let Some(entry) = Self::current(db, ticket_id).await? else {
            return Ok(None);
        };

        let mut active: ActiveModel = entry.into();
        active.unassigned_at = Set(Some(at));
        active.reason = Set(reason.filter(|r| !r.trim().is_empty()));
        active.update(db).await.map(Some)
    }

    /// Ledger of a ticket, oldest first.
    pub async fn for_ticket<C: ConnectionTrait>(db: &C, ticket_id: i64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::TicketId.eq(ticket_id))
            .order_by_asc(Column::AssignedAt)
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }

    pub async fn count_opened_since<C: ConnectionTrait>(
        db: &C,
        technician_id: i64,
        since: DateTime<Utc>,
    ) -> Result<u64, DbErr> {
        Entity::find()
            .filter(Column::TechnicianId.eq(technician_id))
            .filter(Column::AssignedAt.gte(since))
            .count(db)
            .await
    }
}
