use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use sea_orm::entity::prelude::*;
use sea_orm::{Condition, QueryOrder};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A repair request for one device.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "repair_tickets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Public short code, `RQ` followed by six hex digits.
    pub code: String,
    pub client_id: i64,
    pub device_type: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub problem_description: String,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub estimated_cost: Option<f64>,
    pub final_cost: Option<f64>,
    pub estimated_completion: Option<NaiveDate>,
    pub actual_completion: Option<NaiveDate>,
    pub assigned_technician_id: Option<i64>,
    pub assigned_by_id: Option<i64>,
    pub assigned_at: Option<DateTime<Utc>>,
    /// `None` for tickets submitted through the public intake endpoint.
    pub created_by_id: Option<i64>,
    pub is_archived: bool,
    pub warranty_days: i32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Workflow position of a ticket.
///
/// Any status may follow any other; the order below is only the usual path.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "ticket_status")]
#[strum(ascii_case_insensitive)]
pub enum TicketStatus {
    #[sea_orm(string_value = "accepted")]
    #[strum(to_string = "accepted")]
    Accepted,

    #[sea_orm(string_value = "diagnostics")]
    #[strum(to_string = "diagnostics")]
    Diagnostics,

    #[sea_orm(string_value = "awaiting_parts")]
    #[strum(to_string = "awaiting_parts", serialize = "Awaiting Parts")]
    AwaitingParts,

    #[sea_orm(string_value = "in_repair")]
    #[strum(to_string = "in_repair", serialize = "In Repair")]
    InRepair,

    #[sea_orm(string_value = "testing")]
    #[strum(to_string = "testing")]
    Testing,

    #[sea_orm(string_value = "ready_for_pickup")]
    #[strum(to_string = "ready_for_pickup", serialize = "Ready for Pickup")]
    ReadyForPickup,

    #[sea_orm(string_value = "delivered")]
    #[strum(to_string = "delivered")]
    Delivered,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 7] = [
        TicketStatus::Accepted,
        TicketStatus::Diagnostics,
        TicketStatus::AwaitingParts,
        TicketStatus::InRepair,
        TicketStatus::Testing,
        TicketStatus::ReadyForPickup,
        TicketStatus::Delivered,
    ];

    /// Statuses that no longer occupy a technician.
    pub const FINISHED: [TicketStatus; 2] = [TicketStatus::ReadyForPickup, TicketStatus::Delivered];

    pub fn label(self) -> &'static str {
        match self {
            TicketStatus::Accepted => "Accepted",
            TicketStatus::Diagnostics => "Diagnostics",
            TicketStatus::AwaitingParts => "Awaiting Parts",
            TicketStatus::InRepair => "In Repair",
            TicketStatus::Testing => "Testing",
            TicketStatus::ReadyForPickup => "Ready for Pickup",
            TicketStatus::Delivered => "Delivered",
        }
    }

    /// Whether a ticket in this status counts towards a technician's workload.
    pub fn is_active(self) -> bool {
        !Self::FINISHED.contains(&self)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Serialize,
    Deserialize,
    Default,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "ticket_priority")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TicketPriority {
    #[sea_orm(string_value = "low")]
    Low,

    #[default]
    #[sea_orm(string_value = "normal")]
    Normal,

    #[sea_orm(string_value = "high")]
    High,

    #[sea_orm(string_value = "critical")]
    Critical,
}

impl TicketPriority {
    /// Sort key for work queues; lower comes first.
    pub fn rank(self) -> u8 {
        match self {
            TicketPriority::Critical => 1,
            TicketPriority::High => 2,
            TicketPriority::Normal => 3,
            TicketPriority::Low => 4,
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id"
    )]
    Client,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AssignedTechnicianId",
        to = "super::user::Column::Id"
    )]
    Technician,

    #[sea_orm(has_many = "super::status_history::Entity")]
    StatusHistory,

    #[sea_orm(has_many = "super::assignment_entry::Entity")]
    Assignments,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Technician.def()
    }
}

impl Related<super::status_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StatusHistory.def()
    }
}

impl Related<super::assignment_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Listing filter for [`Model::search`].
#[derive(Debug, Clone)]
pub struct TicketFilter {
    pub include_archived: bool,
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
    pub technician_id: Option<i64>,
    pub client_id: Option<i64>,
    pub query: Option<String>,
    pub page: u64,
    pub per_page: u64,
}

impl Default for TicketFilter {
    fn default() -> Self {
        Self {
            include_archived: false,
            status: None,
            priority: None,
            technician_id: None,
            client_id: None,
            query: None,
            page: 1,
            per_page: 20,
        }
    }
}

pub const MAX_PER_PAGE: u64 = 100;

fn random_code() -> String {
    let value: u32 = rand::thread_rng().gen_range(0..=0x00FF_FFFF);
    format!("RQ{value:06X}")
}

impl Model {
    /// Returns a ticket code not yet present in the store.
    pub async fn generate_code<C: ConnectionTrait>(db: &C) -> Result<String, DbErr> {
        loop {
            let code = random_code();
            let taken = Entity::find()
                .filter(Column::Code.eq(code.as_str()))
                .count(db)
                .await?
                > 0;
            if !taken {
                return Ok(code);
            }
        }
    }

    pub async fn get_by_id<C: ConnectionTrait>(db: &C, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn find_by_code<C: ConnectionTrait>(
        db: &C,
        code: &str,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::Code.eq(code.trim().to_ascii_uppercase()))
            .one(db)
            .await
    }

    /// Paginated listing, newest first. Returns the page and the total match count.
    pub async fn search(
        db: &DatabaseConnection,
        filter: &TicketFilter,
    ) -> Result<(Vec<Model>, u64), DbErr> {
        let mut condition = Condition::all();

        if !filter.include_archived {
            condition = condition.add(Column::IsArchived.eq(false));
        }
        if let Some(status) = filter.status {
            condition = condition.add(Column::Status.eq(status));
        }
        if let Some(priority) = filter.priority {
            condition = condition.add(Column::Priority.eq(priority));
        }
        if let Some(technician_id) = filter.technician_id {
            condition = condition.add(Column::AssignedTechnicianId.eq(technician_id));
        }
        if let Some(client_id) = filter.client_id {
            condition = condition.add(Column::ClientId.eq(client_id));
        }
        if let Some(query) = filter.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            let pattern = format!("%{query}%");
            condition = condition.add(
                Condition::any()
                    .add(Column::Code.like(&pattern))
                    .add(Column::DeviceType.like(&pattern))
                    .add(Column::Brand.like(&pattern))
                    .add(Column::Model.like(&pattern))
                    .add(Column::ProblemDescription.like(&pattern)),
            );
        }

        let per_page = filter.per_page.clamp(1, MAX_PER_PAGE);
        let page = filter.page.max(1);

        let paginator = Entity::find()
            .filter(condition)
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(db, per_page);

        let total = paginator.num_items().await?;
        let tickets = paginator.fetch_page(page - 1).await?;
        Ok((tickets, total))
    }

    pub async fn recent(db: &DatabaseConnection, limit: u64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::IsArchived.eq(false))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(db, limit.max(1))
            .fetch_page(0)
            .await
    }

    pub async fn for_client(db: &DatabaseConnection, client_id: i64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::ClientId.eq(client_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(db)
            .await
    }

    /// Non-archived tickets assigned to `technician_id` that still need work,
    /// ordered by priority rank, then creation time.
    pub async fn active_for_technician<C: ConnectionTrait>(
        db: &C,
        technician_id: i64,
    ) -> Result<Vec<Model>, DbErr> {
        let mut tickets = Entity::find()
            .filter(Self::active_for(technician_id))
            .all(db)
            .await?;

        tickets.sort_by_key(|t| (t.priority.rank(), t.created_at, t.id));
        Ok(tickets)
    }

    pub async fn count_active_for<C: ConnectionTrait>(
        db: &C,
        technician_id: i64,
    ) -> Result<u64, DbErr> {
        Entity::find()
            .filter(Self::active_for(technician_id))
            .count(db)
            .await
    }

    fn active_for(technician_id: i64) -> Condition {
        Condition::all()
            .add(Column::AssignedTechnicianId.eq(technician_id))
            .add(Column::IsArchived.eq(false))
            .add(Column::Status.is_not_in(TicketStatus::FINISHED))
    }

    pub fn device_label(&self) -> String {
        [Some(self.device_type.as_str()), self.brand.as_deref(), self.model.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
