use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use db::workflow::{self, TicketChanges};
use serde::Deserialize;
use util::state::AppState;
use validator::Validate;

use super::common::{TicketResponse, find_ticket, parse_priority, parse_status};
use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::{validation_error, workflow_error};

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTicketRequest {
    #[validate(length(min = 1, max = 100, message = "Device type must not be empty"))]
    pub device_type: Option<String>,
    #[validate(length(max = 100))]
    pub brand: Option<String>,
    #[validate(length(max = 100))]
    pub model: Option<String>,
    #[validate(length(max = 100))]
    pub serial_number: Option<String>,
    #[validate(length(min = 3, message = "Problem description must be at least 3 characters"))]
    pub problem_description: Option<String>,
    pub priority: Option<String>,
    #[validate(range(min = 0.0, message = "Estimated cost must not be negative"))]
    pub estimated_cost: Option<f64>,
    #[validate(range(min = 0.0, message = "Final cost must not be negative"))]
    pub final_cost: Option<f64>,
    pub estimated_completion: Option<NaiveDate>,
    #[validate(range(min = 0, max = 3650, message = "Warranty days must be 0-3650"))]
    pub warranty_days: Option<i32>,
    pub notes: Option<String>,
    pub status: Option<String>,
    pub comment: Option<String>,
}

/// PUT /api/tickets/{code}
///
/// Partial update. A `status` different from the current one is applied as a
/// transition (with `comment` in the history) in the same transaction.
///
/// ### Responses
/// - `200 OK` with the updated ticket
/// - `400 Bad Request`
/// - `404 Not Found`
pub async fn update_ticket(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(code): Path<String>,
    Json(req): Json<UpdateTicketRequest>,
) -> Response {
    if let Err(e) = req.validate() {
        return validation_error(&e).into_response();
    }

    let priority = match req.priority.as_deref().map(parse_priority).transpose() {
        Ok(priority) => priority,
        Err(e) => return e.into_response(),
    };
    let status = match req.status.as_deref().map(parse_status).transpose() {
        Ok(status) => status,
        Err(e) => return e.into_response(),
    };

    let db = app_state.db();
    let ticket = match find_ticket(db, &code).await {
        Ok(ticket) => ticket,
        Err(e) => return e.into_response(),
    };

    let changes = TicketChanges {
        device_type: req.device_type,
        brand: req.brand,
        model: req.model,
        serial_number: req.serial_number,
        problem_description: req.problem_description,
        priority,
        estimated_cost: req.estimated_cost,
        final_cost: req.final_cost,
        estimated_completion: req.estimated_completion,
        warranty_days: req.warranty_days,
        notes: req.notes,
        status,
        comment: req.comment,
    };

    match workflow::update_ticket(db, ticket.id, changes, user.id()).await {
        Ok(ticket) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                TicketResponse::from(ticket),
                "Ticket updated successfully",
            )),
        )
            .into_response(),
        Err(e) => workflow_error(e).into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
    pub comment: Option<String>,
}

/// PUT /api/tickets/{code}/status
///
/// Moves the ticket to any of the seven statuses and appends a history entry.
///
/// ### Request Body
/// ```json
/// { "status": "in_repair", "comment": "Replacing the charging port" }
/// ```
///
/// ### Responses
/// - `200 OK` with the updated ticket
/// - `400 Bad Request` (unknown status)
/// - `404 Not Found`
pub async fn update_status(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(code): Path<String>,
    Json(req): Json<StatusUpdateRequest>,
) -> Response {
    let status = match parse_status(&req.status) {
        Ok(status) => status,
        Err(e) => return e.into_response(),
    };

    let db = app_state.db();
    let ticket = match find_ticket(db, &code).await {
        Ok(ticket) => ticket,
        Err(e) => return e.into_response(),
    };

    match workflow::transition(db, ticket.id, status, user.id(), req.comment).await {
        Ok(ticket) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                TicketResponse::from(ticket),
                "Status updated successfully",
            )),
        )
            .into_response(),
        Err(e) => workflow_error(e).into_response(),
    }
}
