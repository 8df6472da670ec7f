use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use db::models::repair_ticket::TicketPriority;
use db::workflow::{self, ClientRef, NewTicket};
use serde::Deserialize;
use util::state::AppState;
use validator::Validate;

use super::common::{TicketResponse, find_ticket, parse_priority};
use crate::auth::{AuthUser, MaybeAuthUser};
use crate::response::{ApiResponse, api_error};
use crate::routes::common::{validation_error, workflow_error};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTicketRequest {
    /// Registered client; honoured only for authenticated staff.
    pub client_id: Option<i64>,

    #[validate(length(min = 2, max = 200, message = "Client name must be 2-200 characters"))]
    pub client_name: Option<String>,

    #[validate(length(min = 5, max = 30, message = "Client phone must be 5-30 characters"))]
    pub client_phone: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub client_email: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Device type is required"))]
    pub device_type: String,

    #[validate(length(max = 100))]
    pub brand: Option<String>,

    #[validate(length(max = 100))]
    pub model: Option<String>,

    #[validate(length(max = 100))]
    pub serial_number: Option<String>,

    #[validate(length(min = 3, message = "Problem description must be at least 3 characters"))]
    pub problem_description: String,

    pub priority: Option<String>,

    #[validate(range(min = 0.0, message = "Estimated cost must not be negative"))]
    pub estimated_cost: Option<f64>,

    pub estimated_completion: Option<NaiveDate>,

    #[validate(range(min = 0, max = 3650, message = "Warranty days must be 0-3650"))]
    pub warranty_days: Option<i32>,

    pub notes: Option<String>,
}

/// POST /api/tickets
///
/// Registers a repair ticket. Public: anonymous callers identify the client by
/// name and phone (a returning phone number reuses the client record). Staff may
/// pass `client_id` instead and are recorded as the ticket's creator.
///
/// ### Request Body
/// ```json
/// {
///   "client_name": "A. Ivanov",
///   "client_phone": "+375291112233",
///   "device_type": "Laptop",
///   "brand": "Lenovo",
///   "problem_description": "Does not power on",
///   "priority": "high"
/// }
/// ```
///
/// ### Responses
/// - `201 Created` with the ticket (status `accepted`)
/// - `400 Bad Request` (validation failure, unknown priority, missing client details)
/// - `404 Not Found` (`client_id` does not exist)
pub async fn create_ticket(
    State(app_state): State<AppState>,
    MaybeAuthUser(caller): MaybeAuthUser,
    Json(req): Json<CreateTicketRequest>,
) -> Response {
    if let Err(e) = req.validate() {
        return validation_error(&e).into_response();
    }

    let priority = match req.priority.as_deref().map(parse_priority).transpose() {
        Ok(priority) => priority.unwrap_or(TicketPriority::Normal),
        Err(e) => return e.into_response(),
    };

    let client = match (req.client_id, &caller, req.client_name, req.client_phone) {
        (Some(id), Some(_), _, _) => ClientRef::Existing(id),
        (_, _, Some(full_name), Some(phone)) => ClientRef::Contact {
            full_name,
            phone,
            email: req.client_email,
        },
        _ => {
            return api_error(
                StatusCode::BAD_REQUEST,
                "Client name and phone are required",
            )
            .into_response();
        }
    };

    let new = NewTicket {
        client,
        device_type: req.device_type,
        brand: req.brand,
        model: req.model,
        serial_number: req.serial_number,
        problem_description: req.problem_description,
        priority,
        estimated_cost: req.estimated_cost,
        estimated_completion: req.estimated_completion,
        warranty_days: req.warranty_days,
        notes: req.notes,
    };

    match workflow::create_ticket(app_state.db(), new, caller.map(|u| u.id())).await {
        Ok(ticket) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                TicketResponse::from(ticket),
                "Ticket created successfully",
            )),
        )
            .into_response(),
        Err(e) => workflow_error(e).into_response(),
    }
}

/// POST /api/tickets/{code}/archive
///
/// Hides the ticket from default listings and technician workloads.
///
/// ### Responses
/// - `200 OK` with the archived ticket
/// - `404 Not Found`
pub async fn archive_ticket(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(code): Path<String>,
) -> Response {
    let db = app_state.db();
    let ticket = match find_ticket(db, &code).await {
        Ok(ticket) => ticket,
        Err(e) => return e.into_response(),
    };

    match workflow::archive(db, ticket.id, user.id()).await {
        Ok(ticket) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                TicketResponse::from(ticket),
                "Ticket archived successfully",
            )),
        )
            .into_response(),
        Err(e) => workflow_error(e).into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct AssignMasterRequest {
    pub master_id: i64,
}

/// POST /api/tickets/{code}/assign-master
///
/// Assigns a technician, closing any previous assignment. Capacity and
/// availability are not enforced here.
///
/// ### Request Body
/// ```json
/// { "master_id": 4 }
/// ```
///
/// ### Responses
/// - `200 OK` with the updated ticket
/// - `400 Bad Request` (user is not an active master, or ticket archived)
/// - `404 Not Found` (ticket or master)
pub async fn assign_master(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(code): Path<String>,
    Json(req): Json<AssignMasterRequest>,
) -> Response {
    let db = app_state.db();
    let ticket = match find_ticket(db, &code).await {
        Ok(ticket) => ticket,
        Err(e) => return e.into_response(),
    };

    match workflow::assign(db, ticket.id, req.master_id, user.id()).await {
        Ok(ticket) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                TicketResponse::from(ticket),
                "Master assigned successfully",
            )),
        )
            .into_response(),
        Err(e) => workflow_error(e).into_response(),
    }
}
