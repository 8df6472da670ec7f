use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::assignment_entry::Model as AssignmentModel;
use db::models::client::Model as ClientModel;
use db::models::repair_ticket::{Model as TicketModel, TicketFilter};
use db::models::status_history::Model as HistoryModel;
use db::models::user::Model as UserModel;
use serde::{Deserialize, Serialize};
use util::state::AppState;
use validator::Validate;

use super::common::{
    HistoryEntryResponse, PublicStatusResponse, TicketResponse, find_ticket, parse_priority,
    parse_status,
};
use crate::response::ApiResponse;
use crate::routes::common::{StaffBrief, db_error, validation_error};

#[derive(Debug, Deserialize, Validate)]
pub struct ListTicketsQuery {
    pub include_archived: Option<bool>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub technician_id: Option<i64>,
    pub client_id: Option<i64>,
    pub query: Option<String>,
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: Option<u64>,
    #[validate(range(min = 1, max = 100, message = "Per page must be between 1 and 100"))]
    pub per_page: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct TicketListResponse {
    pub tickets: Vec<TicketResponse>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}

/// GET /api/tickets
///
/// Paginated ticket list, newest first. Archived tickets are hidden unless
/// `include_archived=true`.
///
/// ### Query Parameters
/// - `include_archived` (default `false`)
/// - `status`, `priority`: exact match on the wire value
/// - `technician_id`, `client_id`
/// - `query`: substring of code, device or problem description
/// - `page` (default 1), `per_page` (default 20, max 100)
///
/// ### Responses
/// - `200 OK` with `{ tickets, page, per_page, total }`
/// - `400 Bad Request` (invalid status, priority or paging)
pub async fn list_tickets(
    State(app_state): State<AppState>,
    Query(query): Query<ListTicketsQuery>,
) -> Response {
    if let Err(e) = query.validate() {
        return validation_error(&e).into_response();
    }

    let status = match query.status.as_deref().map(parse_status).transpose() {
        Ok(status) => status,
        Err(e) => return e.into_response(),
    };
    let priority = match query.priority.as_deref().map(parse_priority).transpose() {
        Ok(priority) => priority,
        Err(e) => return e.into_response(),
    };

    let filter = TicketFilter {
        include_archived: query.include_archived.unwrap_or(false),
        status,
        priority,
        technician_id: query.technician_id,
        client_id: query.client_id,
        query: query.query,
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(20),
    };

    match TicketModel::search(app_state.db(), &filter).await {
        Ok((tickets, total)) => {
            let body = TicketListResponse {
                tickets: tickets.into_iter().map(TicketResponse::from).collect(),
                page: filter.page,
                per_page: filter.per_page,
                total,
            };
            (
                StatusCode::OK,
                Json(ApiResponse::success(body, "Tickets retrieved successfully")),
            )
                .into_response()
        }
        Err(e) => db_error("Failed to list tickets", e).into_response(),
    }
}

#[derive(Debug, Serialize)]
pub struct TicketDetailResponse {
    #[serde(flatten)]
    pub ticket: TicketResponse,
    pub client: Option<ClientModel>,
    pub technician: Option<StaffBrief>,
}

/// GET /api/tickets/{code}
///
/// Ticket with its client and current technician.
///
/// ### Responses
/// - `200 OK`
/// - `404 Not Found`
pub async fn get_ticket(State(app_state): State<AppState>, Path(code): Path<String>) -> Response {
    let db = app_state.db();
    let ticket = match find_ticket(db, &code).await {
        Ok(ticket) => ticket,
        Err(e) => return e.into_response(),
    };

    let client = match ClientModel::get_by_id(db, ticket.client_id).await {
        Ok(client) => client,
        Err(e) => return db_error("Failed to load ticket client", e).into_response(),
    };

    let technician = match ticket.assigned_technician_id {
        Some(id) => match UserModel::get_by_id(db, id).await {
            Ok(user) => user.map(StaffBrief::from),
            Err(e) => return db_error("Failed to load ticket technician", e).into_response(),
        },
        None => None,
    };

    let body = TicketDetailResponse {
        ticket: ticket.into(),
        client,
        technician,
    };
    (
        StatusCode::OK,
        Json(ApiResponse::success(body, "Ticket retrieved successfully")),
    )
        .into_response()
}

/// GET /api/tickets/{code}/status
///
/// Public status lookup for customers holding a ticket code. Exposes no client
/// or staff details.
pub async fn get_public_status(
    State(app_state): State<AppState>,
    Path(code): Path<String>,
) -> Response {
    match find_ticket(app_state.db(), &code).await {
        Ok(ticket) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                PublicStatusResponse::from(ticket),
                "Ticket status retrieved successfully",
            )),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /api/tickets/{code}/history
///
/// Status trail, oldest first. The first entry has `old_status: null`.
pub async fn get_history(State(app_state): State<AppState>, Path(code): Path<String>) -> Response {
    let db = app_state.db();
    let ticket = match find_ticket(db, &code).await {
        Ok(ticket) => ticket,
        Err(e) => return e.into_response(),
    };

    match HistoryModel::for_ticket(db, ticket.id).await {
        Ok(entries) => {
            let body: Vec<HistoryEntryResponse> = entries.into_iter().map(Into::into).collect();
            (
                StatusCode::OK,
                Json(ApiResponse::success(body, "Status history retrieved successfully")),
            )
                .into_response()
        }
        Err(e) => db_error("Failed to load status history", e).into_response(),
    }
}

/// GET /api/tickets/{code}/assignments
///
/// Assignment ledger, oldest first. The open entry has `unassigned_at: null`.
pub async fn get_assignments(
    State(app_state): State<AppState>,
    Path(code): Path<String>,
) -> Response {
    let db = app_state.db();
    let ticket = match find_ticket(db, &code).await {
        Ok(ticket) => ticket,
        Err(e) => return e.into_response(),
    };

    match AssignmentModel::for_ticket(db, ticket.id).await {
        Ok(entries) => (
            StatusCode::OK,
            Json(ApiResponse::success(entries, "Assignments retrieved successfully")),
        )
            .into_response(),
        Err(e) => db_error("Failed to load assignments", e).into_response(),
    }
}
