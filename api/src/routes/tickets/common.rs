use axum::http::StatusCode;
use chrono::{DateTime, NaiveDate, Utc};
use db::models::repair_ticket::{Model as TicketModel, TicketPriority, TicketStatus};
use db::models::status_history::Model as HistoryModel;
use sea_orm::DatabaseConnection;
use serde::Serialize;

use crate::response::{ApiError, api_error};
use crate::routes::common::db_error;

/// Ticket as returned to staff: every column plus the display label of its status.
#[derive(Debug, Serialize)]
pub struct TicketResponse {
    #[serde(flatten)]
    pub ticket: TicketModel,
    pub status_label: &'static str,
}

impl From<TicketModel> for TicketResponse {
    fn from(ticket: TicketModel) -> Self {
        Self {
            status_label: ticket.status.label(),
            ticket,
        }
    }
}

/// What an anonymous caller may learn about a ticket from its code.
#[derive(Debug, Serialize)]
pub struct PublicStatusResponse {
    pub code: String,
    pub device: String,
    pub status: TicketStatus,
    pub status_label: &'static str,
    pub estimated_completion: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TicketModel> for PublicStatusResponse {
    fn from(ticket: TicketModel) -> Self {
        Self {
            device: ticket.device_label(),
            status_label: ticket.status.label(),
            code: ticket.code,
            status: ticket.status,
            estimated_completion: ticket.estimated_completion,
            created_at: ticket.created_at,
            updated_at: ticket.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryEntryResponse {
    pub id: i64,
    pub old_status: Option<TicketStatus>,
    pub new_status: TicketStatus,
    pub new_status_label: &'static str,
    pub changed_by: Option<i64>,
    pub comment: Option<String>,
    pub changed_at: DateTime<Utc>,
}

impl From<HistoryModel> for HistoryEntryResponse {
    fn from(entry: HistoryModel) -> Self {
        Self {
            id: entry.id,
            old_status: entry.old_status,
            new_status: entry.new_status,
            new_status_label: entry.new_status.label(),
            changed_by: entry.changed_by,
            comment: entry.comment,
            changed_at: entry.changed_at,
        }
    }
}

pub async fn find_ticket(db: &DatabaseConnection, code: &str) -> Result<TicketModel, ApiError> {
    match TicketModel::find_by_code(db, code).await {
        Ok(Some(ticket)) => Ok(ticket),
        Ok(None) => Err(api_error(StatusCode::NOT_FOUND, "Ticket not found")),
        Err(e) => Err(db_error("Failed to load ticket", e)),
    }
}

pub fn parse_status(value: &str) -> Result<TicketStatus, ApiError> {
    value.parse::<TicketStatus>().map_err(|_| {
        let allowed: Vec<String> = TicketStatus::ALL.iter().map(|s| s.to_string()).collect();
        api_error(
            StatusCode::BAD_REQUEST,
            format!("Invalid status '{value}'. Expected one of: {}", allowed.join(", ")),
        )
    })
}

pub fn parse_priority(value: &str) -> Result<TicketPriority, ApiError> {
    value.parse::<TicketPriority>().map_err(|_| {
        api_error(
            StatusCode::BAD_REQUEST,
            format!("Invalid priority '{value}'. Expected one of: low, normal, high, critical"),
        )
    })
}
