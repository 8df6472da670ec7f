use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{Condition, QueryOrder, Set, TransactionTrait};
use serde::Serialize;

use super::repair_ticket::{self, TicketStatus};

/// A customer who brings devices in for repair.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub full_name: String,
    /// Unique; public ticket intake matches returning clients on it.
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub is_vip: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::repair_ticket::Entity")]
    Tickets,
}

impl Related<super::repair_ticket::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tickets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Default)]
pub struct NewClient {
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub is_vip: bool,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ClientChanges {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub is_vip: Option<bool>,
    pub notes: Option<String>,
}

impl ClientChanges {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.address.is_none()
            && self.is_vip.is_none()
            && self.notes.is_none()
    }
}

/// Ticket figures for one client, derived from `repair_tickets`.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ClientTicketStats {
    pub total_tickets: u64,
    pub active_tickets: u64,
    pub total_spent: f64,
    pub device_types: Vec<String>,
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

impl Model {
    pub async fn create<C: ConnectionTrait>(db: &C, new: NewClient) -> Result<Model, DbErr> {
        let now = Utc::now();
        ActiveModel {
            full_name: Set(new.full_name.trim().to_owned()),
            phone: Set(new.phone.trim().to_owned()),
            email: Set(blank_to_none(new.email)),
            address: Set(blank_to_none(new.address)),
            is_vip: Set(new.is_vip),
            notes: Set(blank_to_none(new.notes)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn get_by_id<C: ConnectionTrait>(db: &C, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn get_by_phone<C: ConnectionTrait>(
        db: &C,
        phone: &str,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::Phone.eq(phone.trim()))
            .one(db)
            .await
    }

    /// Returns the client registered under `phone`, creating it when absent.
    pub async fn find_or_create<C: ConnectionTrait>(
        db: &C,
        full_name: &str,
        phone: &str,
        email: Option<String>,
    ) -> Result<Model, DbErr> {
        if let Some(existing) = Self::get_by_phone(db, phone).await? {
            return Ok(existing);
        }

        Self::create(
            db,
            NewClient {
                full_name: full_name.to_owned(),
                phone: phone.to_owned(),
                email,
                ..Default::default()
            },
        )
        .await
    }

    /// All clients, newest first, optionally narrowed by a name / phone / email substring.
    pub async fn search(db: &DatabaseConnection, term: Option<&str>) -> Result<Vec<Model>, DbErr> {
        let mut query = Entity::find();

        if let Some(term) = term.map(str::trim).filter(|t| !t.is_empty()) {
            let pattern = format!("%{term}%");
            query = query.filter(
                Condition::any()
                    .add(Column::FullName.like(&pattern))
                    .add(Column::Phone.like(&pattern))
                    .add(Column::Email.like(&pattern)),
            );
        }

        query
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(db)
            .await
    }

    pub async fn vip(db: &DatabaseConnection) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::IsVip.eq(true))
            .order_by_asc(Column::FullName)
            .all(db)
            .await
    }

    pub async fn update_fields(
        db: &DatabaseConnection,
        id: i64,
        changes: ClientChanges,
    ) -> Result<Model, DbErr> {
        let client = Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("Client {id} not found")))?;

        let mut active: ActiveModel = client.into();

        if let Some(full_name) = changes.full_name {
            active.full_name = Set(full_name.trim().to_owned());
        }
        if let Some(phone) = changes.phone {
            active.phone = Set(phone.trim().to_owned());
        }
        if changes.email.is_some() {
            active.email = Set(blank_to_none(changes.email));
        }
        if changes.address.is_some() {
            active.address = Set(blank_to_none(changes.address));
        }
        if let Some(is_vip) = changes.is_vip {
            active.is_vip = Set(is_vip);
        }
        if changes.notes.is_some() {
            active.notes = Set(blank_to_none(changes.notes));
        }

        active.updated_at = Set(Utc::now());
        active.update(db).await
    }

    /// Deletes a client that has no tickets in progress.
    ///
    /// Returns `Ok(false)` when an unfinished, non-archived ticket still references the
    /// client. Finished or archived tickets are removed along with the client.
    pub async fn delete_if_idle(db: &DatabaseConnection, id: i64) -> Result<bool, DbErr> {
        let txn = db.begin().await?;

        let in_progress = repair_ticket::Entity::find()
            .filter(repair_ticket::Column::ClientId.eq(id))
            .filter(repair_ticket::Column::IsArchived.eq(false))
            .filter(repair_ticket::Column::Status.ne(TicketStatus::Delivered))
            .count(&txn)
            .await?;

        if in_progress > 0 {
            return Ok(false);
        }

        repair_ticket::Entity::delete_many()
            .filter(repair_ticket::Column::ClientId.eq(id))
            .exec(&txn)
            .await?;

        let result = Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        Ok(result.rows_affected == 1)
    }

    pub async fn ticket_stats(db: &DatabaseConnection, id: i64) -> Result<ClientTicketStats, DbErr> {
        let tickets = repair_ticket::Entity::find()
            .filter(repair_ticket::Column::ClientId.eq(id))
            .all(db)
            .await?;

        let mut stats = ClientTicketStats::default();
        for ticket in &tickets {
            stats.total_tickets += 1;
            if !ticket.is_archived && ticket.status != TicketStatus::Delivered {
                stats.active_tickets += 1;
            }
            stats.total_spent += ticket.final_cost.unwrap_or(0.0);
            if !stats.device_types.contains(&ticket.device_type) {
                stats.device_types.push(ticket.device_type.clone());
            }
        }
        stats.device_types.sort();
        Ok(stats)
    }
}
