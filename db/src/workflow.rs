//! Ticket workflow: intake, status transitions, technician assignment and workload.
//!
//! Every mutating operation here runs in a single database transaction. Inside a
//! transaction all statements go through the transaction handle, never the pool.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{Set, TransactionTrait};
use serde::Serialize;
use tracing::info;

use crate::models::assignment_entry::Model as AssignmentEntryModel;
use crate::models::client::Model as ClientModel;
use crate::models::repair_ticket::{
    self, Model as TicketModel, TicketPriority, TicketStatus,
};
use crate::models::status_history::Model as StatusHistoryModel;
use crate::models::technician_skill::Model as SkillModel;
use crate::models::user::{self, Role};

pub type WorkflowResult<T> = Result<T, WorkflowError>;

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("Ticket has no assigned technician")]
    NoCurrentAssignment,

    #[error("Database error: {0}")]
    Db(#[from] DbErr),
}

/// Who the ticket is for.
#[derive(Debug, Clone)]
pub enum ClientRef {
    /// A registered client.
    Existing(i64),
    /// Contact details from an intake form; matched on phone, created when unknown.
    Contact {
        full_name: String,
        phone: String,
        email: Option<String>,
    },
}

#[derive(Debug, Clone)]
pub struct NewTicket {
    pub client: ClientRef,
    pub device_type: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub problem_description: String,
    pub priority: TicketPriority,
    pub estimated_cost: Option<f64>,
    pub estimated_completion: Option<NaiveDate>,
    pub warranty_days: Option<i32>,
    pub notes: Option<String>,
}

/// Partial ticket edit. A `status` here is applied as a regular transition.
#[derive(Debug, Clone, Default)]
pub struct TicketChanges {
    pub device_type: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub problem_description: Option<String>,
    pub priority: Option<TicketPriority>,
    pub estimated_cost: Option<f64>,
    pub final_cost: Option<f64>,
    pub estimated_completion: Option<NaiveDate>,
    pub warranty_days: Option<i32>,
    pub notes: Option<String>,
    pub status: Option<TicketStatus>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillSummary {
    pub name: String,
    pub level: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct TechnicianSummary {
    pub id: i64,
    pub username: String,
    pub full_name: String,
    pub specialization: Option<String>,
    pub active_ticket_count: u64,
    pub max_concurrent_tickets: i32,
    pub is_available: bool,
    pub skills: Vec<SkillSummary>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct WorkloadStats {
    pub assigned: u64,
    pub completed: u64,
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Workload {
    pub technician: TechnicianSummary,
    pub active_tickets: Vec<TicketModel>,
    pub stats_30d: WorkloadStats,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn ensure_cost(label: &str, cost: Option<f64>) -> WorkflowResult<()> {
    match cost {
        Some(c) if !c.is_finite() || c < 0.0 => Err(WorkflowError::Validation(format!(
            "{label} must be a non-negative amount"
        ))),
        _ => Ok(()),
    }
}

fn ensure_warranty(days: Option<i32>) -> WorkflowResult<()> {
    match days {
        Some(d) if d < 0 => Err(WorkflowError::Validation(
            "Warranty days must not be negative".into(),
        )),
        _ => Ok(()),
    }
}

async fn load_ticket<C: ConnectionTrait>(db: &C, ticket_id: i64) -> WorkflowResult<TicketModel> {
    TicketModel::get_by_id(db, ticket_id)
        .await?
        .ok_or_else(|| WorkflowError::NotFound(format!("Ticket {ticket_id} not found")))
}

async fn load_technician<C: ConnectionTrait>(db: &C, technician_id: i64) -> WorkflowResult<user::Model> {
    let technician = user::Entity::find_by_id(technician_id)
        .one(db)
        .await?
        .ok_or_else(|| WorkflowError::NotFound(format!("Technician {technician_id} not found")))?;

    if technician.role != Role::Master {
        return Err(WorkflowError::Validation(format!(
            "User {technician_id} is not a technician"
        )));
    }
    Ok(technician)
}

/// Recomputes and stores the active-ticket count of a technician from live ticket state.
pub async fn refresh_active_count<C: ConnectionTrait>(db: &C, technician_id: i64) -> Result<u64, DbErr> {
    let count = TicketModel::count_active_for(db, technician_id).await?;

    user::Entity::update_many()
        .col_expr(user::Column::ActiveTicketCount, Expr::value(count as i32))
        .filter(user::Column::Id.eq(technician_id))
        .exec(db)
        .await?;

    Ok(count)
}

/// Registers a new ticket in status Accepted with no technician.
pub async fn create_ticket(
    db: &DatabaseConnection,
    new: NewTicket,
    created_by: Option<i64>,
) -> WorkflowResult<TicketModel> {
    let device_type = new.device_type.trim().to_owned();
    let problem = new.problem_description.trim().to_owned();
    if device_type.is_empty() {
        return Err(WorkflowError::Validation("Device type is required".into()));
    }
    if problem.is_empty() {
        return Err(WorkflowError::Validation("Problem description is required".into()));
    }
    ensure_cost("Estimated cost", new.estimated_cost)?;
    ensure_warranty(new.warranty_days)?;

    let txn = db.begin().await?;

    let client = match new.client {
        ClientRef::Existing(id) => ClientModel::get_by_id(&txn, id)
            .await?
            .ok_or_else(|| WorkflowError::NotFound(format!("Client {id} not found")))?,
        ClientRef::Contact { full_name, phone, email } => {
            if full_name.trim().is_empty() || phone.trim().is_empty() {
                return Err(WorkflowError::Validation(
                    "Client name and phone are required".into(),
                ));
            }
            ClientModel::find_or_create(&txn, &full_name, &phone, non_blank(email)).await?
        }
    };

    let code = TicketModel::generate_code(&txn).await?;
    let now = Utc::now();

    let ticket = repair_ticket::ActiveModel {
        code: Set(code),
        client_id: Set(client.id),
        device_type: Set(device_type),
        brand: Set(non_blank(new.brand)),
        model: Set(non_blank(new.model)),
        serial_number: Set(non_blank(new.serial_number)),
        problem_description: Set(problem),
        status: Set(TicketStatus::Accepted),
        priority: Set(new.priority),
        estimated_cost: Set(new.estimated_cost),
        final_cost: Set(None),
        estimated_completion: Set(new.estimated_completion),
        actual_completion: Set(None),
        assigned_technician_id: Set(None),
        assigned_by_id: Set(None),
        assigned_at: Set(None),
        created_by_id: Set(created_by),
        is_archived: Set(false),
        warranty_days: Set(new.warranty_days.unwrap_or(30)),
        notes: Set(non_blank(new.notes)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    StatusHistoryModel::append(
        &txn,
        ticket.id,
        None,
        TicketStatus::Accepted,
        created_by,
        Some("Ticket created".into()),
    )
    .await?;

    txn.commit().await?;

    info!(ticket = %ticket.code, client_id = client.id, "Ticket created");
    Ok(ticket)
}

async fn apply_transition<C: ConnectionTrait>(
    db: &C,
    ticket: TicketModel,
    new_status: TicketStatus,
    actor: Option<i64>,
    comment: Option<String>,
) -> WorkflowResult<TicketModel> {
    let old_status = ticket.status;
    let technician = ticket.assigned_technician_id;
    let needs_completion_date = new_status == TicketStatus::Delivered && ticket.actual_completion.is_none();

    let mut active: repair_ticket::ActiveModel = ticket.into();
    active.status = Set(new_status);
    active.updated_at = Set(Utc::now());
    if needs_completion_date {
        active.actual_completion = Set(Some(Utc::now().date_naive()));
    }
    let updated = active.update(db).await?;

    StatusHistoryModel::append(db, updated.id, Some(old_status), new_status, actor, comment).await?;

    if let Some(technician_id) = technician {
        refresh_active_count(db, technician_id).await?;
    }

    Ok(updated)
}

/// Moves a ticket to `new_status` and records the change. Any status may follow any other.
pub async fn transition(
    db: &DatabaseConnection,
    ticket_id: i64,
    new_status: TicketStatus,
    acting_user_id: i64,
    comment: Option<String>,
) -> WorkflowResult<TicketModel> {
    let txn = db.begin().await?;

    let ticket = load_ticket(&txn, ticket_id).await?;
    let old_status = ticket.status;
    let updated = apply_transition(&txn, ticket, new_status, Some(acting_user_id), comment).await?;

    txn.commit().await?;

    info!(
        ticket = %updated.code,
        from = %old_status,
        to = %new_status,
        user_id = acting_user_id,
        "Ticket status changed"
    );
    Ok(updated)
}

/// Edits ticket fields and, when a different status is given, transitions it, all at once.
pub async fn update_ticket(
    db: &DatabaseConnection,
    ticket_id: i64,
    changes: TicketChanges,
    acting_user_id: i64,
) -> WorkflowResult<TicketModel> {
    ensure_cost("Estimated cost", changes.estimated_cost)?;
    ensure_cost("Final cost", changes.final_cost)?;
    ensure_warranty(changes.warranty_days)?;
    if changes
        .device_type
        .as_deref()
        .is_some_and(|d| d.trim().is_empty())
    {
        return Err(WorkflowError::Validation("Device type must not be empty".into()));
    }
    if changes
        .problem_description
        .as_deref()
        .is_some_and(|p| p.trim().is_empty())
    {
        return Err(WorkflowError::Validation(
            "Problem description must not be empty".into(),
        ));
    }

    let txn = db.begin().await?;

    let ticket = load_ticket(&txn, ticket_id).await?;
    let current_status = ticket.status;

    let mut active: repair_ticket::ActiveModel = ticket.into();
    if let Some(device_type) = changes.device_type {
        active.device_type = Set(device_type.trim().to_owned());
    }
    if changes.brand.is_some() {
        active.brand = Set(non_blank(changes.brand));
    }
    if changes.model.is_some() {
        active.model = Set(non_blank(changes.model));
    }
    if changes.serial_number.is_some() {
        active.serial_number = Set(non_blank(changes.serial_number));
    }
    if let Some(problem) = changes.problem_description {
        active.problem_description = Set(problem.trim().to_owned());
    }
    if let Some(priority) = changes.priority {
        active.priority = Set(priority);
    }
    if let Some(cost) = changes.estimated_cost {
        active.estimated_cost = Set(Some(cost));
    }
    if let Some(cost) = changes.final_cost {
        active.final_cost = Set(Some(cost));
    }
    if let Some(date) = changes.estimated_completion {
        active.estimated_completion = Set(Some(date));
    }
    if let Some(days) = changes.warranty_days {
        active.warranty_days = Set(days);
    }
    if changes.notes.is_some() {
        active.notes = Set(non_blank(changes.notes));
    }
    active.updated_at = Set(Utc::now());
    let mut updated = active.update(&txn).await?;

    if let Some(status) = changes.status.filter(|s| *s != current_status) {
        updated = apply_transition(&txn, updated, status, Some(acting_user_id), changes.comment).await?;
        info!(ticket = %updated.code, from = %current_status, to = %status, "Ticket status changed");
    }

    txn.commit().await?;
    Ok(updated)
}

/// Hands a ticket to a technician, closing any previous assignment.
pub async fn assign(
    db: &DatabaseConnection,
    ticket_id: i64,
    technician_id: i64,
    assigner_id: i64,
) -> WorkflowResult<TicketModel> {
    let txn = db.begin().await?;

    let ticket = load_ticket(&txn, ticket_id).await?;
    if ticket.is_archived {
        return Err(WorkflowError::Validation(format!(
            "Ticket {} is archived",
            ticket.code
        )));
    }

    let technician = load_technician(&txn, technician_id).await?;
    if !technician.is_active {
        return Err(WorkflowError::Validation(format!(
            "Technician {} is deactivated",
            technician.username
        )));
    }

    let now = Utc::now();
    let previous = ticket.assigned_technician_id;
    AssignmentEntryModel::close_open(&txn, ticket.id, None, now).await?;

    let mut active: repair_ticket::ActiveModel = ticket.into();
    active.assigned_technician_id = Set(Some(technician_id));
    active.assigned_by_id = Set(Some(assigner_id));
    active.assigned_at = Set(Some(now));
    active.updated_at = Set(now);
    let updated = active.update(&txn).await?;

    AssignmentEntryModel::open(&txn, updated.id, technician_id, Some(assigner_id), now).await?;

    refresh_active_count(&txn, technician_id).await?;
    if let Some(previous_id) = previous.filter(|id| *id != technician_id) {
        refresh_active_count(&txn, previous_id).await?;
    }

    txn.commit().await?;

    info!(
        ticket = %updated.code,
        technician_id,
        previous_technician_id = ?previous,
        assigned_by = assigner_id,
        "Technician assigned"
    );
    Ok(updated)
}

/// Removes the current technician from a ticket.
pub async fn unassign(
    db: &DatabaseConnection,
    ticket_id: i64,
    reason: Option<String>,
) -> WorkflowResult<TicketModel> {
    let txn = db.begin().await?;

    let ticket = load_ticket(&txn, ticket_id).await?;
    let Some(technician_id) = ticket.assigned_technician_id else {
        return Err(WorkflowError::NoCurrentAssignment);
    };

    let now = Utc::now();
    let mut active: repair_ticket::ActiveModel = ticket.into();
    active.assigned_technician_id = Set(None);
    active.assigned_by_id = Set(None);
    active.assigned_at = Set(None);
    active.updated_at = Set(now);
    let updated = active.update(&txn).await?;

    AssignmentEntryModel::close_open(&txn, updated.id, reason, now).await?;
    refresh_active_count(&txn, technician_id).await?;

    txn.commit().await?;

    info!(ticket = %updated.code, technician_id, "Technician unassigned");
    Ok(updated)
}

/// Hides a ticket from default listings and workloads. Archiving twice is a no-op.
pub async fn archive(
    db: &DatabaseConnection,
    ticket_id: i64,
    acting_user_id: i64,
) -> WorkflowResult<TicketModel> {
    let txn = db.begin().await?;

    let ticket = load_ticket(&txn, ticket_id).await?;
    if ticket.is_archived {
        txn.commit().await?;
        return Ok(ticket);
    }

    let technician = ticket.assigned_technician_id;
    let mut active: repair_ticket::ActiveModel = ticket.into();
    active.is_archived = Set(true);
    active.updated_at = Set(Utc::now());
    let updated = active.update(&txn).await?;

    if let Some(technician_id) = technician {
        refresh_active_count(&txn, technician_id).await?;
    }

    txn.commit().await?;

    info!(ticket = %updated.code, user_id = acting_user_id, "Ticket archived");
    Ok(updated)
}

/// Current queue and 30-day figures of one technician. Read-only.
pub async fn workload(db: &DatabaseConnection, technician_id: i64) -> WorkflowResult<Workload> {
    let technician = load_technician(db, technician_id).await?;
    let active_tickets = TicketModel::active_for_technician(db, technician_id).await?;
    let skills = SkillModel::for_user(db, technician_id).await?;
    let stats_30d = stats_since(db, technician_id, Utc::now() - Duration::days(30)).await?;

    Ok(Workload {
        technician: TechnicianSummary {
            id: technician.id,
            username: technician.username,
            full_name: technician.full_name,
            specialization: technician.specialization,
            active_ticket_count: active_tickets.len() as u64,
            max_concurrent_tickets: technician.max_concurrent_tickets,
            is_available: technician.is_available,
            skills: skills
                .into_iter()
                .map(|s| SkillSummary {
                    name: s.name,
                    level: s.level,
                })
                .collect(),
        },
        active_tickets,
        stats_30d,
    })
}

async fn stats_since(
    db: &DatabaseConnection,
    technician_id: i64,
    since: DateTime<Utc>,
) -> Result<WorkloadStats, DbErr> {
    let assigned = AssignmentEntryModel::count_opened_since(db, technician_id, since).await?;

    let tickets = repair_ticket::Entity::find()
        .filter(repair_ticket::Column::AssignedTechnicianId.eq(technician_id))
        .all(db)
        .await?;
    let ids: Vec<i64> = tickets.iter().map(|t| t.id).collect();

    let completed =
        StatusHistoryModel::count_entries_into(db, &ids, TicketStatus::ReadyForPickup, since).await?;

    let since_date = since.date_naive();
    let revenue = tickets
        .iter()
        .filter(|t| t.status == TicketStatus::Delivered)
        .filter(|t| t.actual_completion.is_some_and(|d| d >= since_date))
        .filter_map(|t| t.final_cost)
        .sum();

    Ok(WorkloadStats {
        assigned,
        completed,
        revenue,
    })
}
