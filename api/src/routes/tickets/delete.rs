use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::workflow;
use serde::Deserialize;
use util::state::AppState;

use super::common::{TicketResponse, find_ticket};
use crate::response::ApiResponse;
use crate::routes::common::workflow_error;

#[derive(Debug, Deserialize)]
pub struct UnassignQuery {
    pub reason: Option<String>,
}

/// DELETE /api/tickets/{code}/assign-master?reason=...
///
/// Removes the current technician and closes the open ledger entry with the
/// optional reason.
///
/// ### Responses
/// - `200 OK` with the updated ticket
/// - `404 Not Found`
/// - `409 Conflict` (ticket has no technician)
pub async fn unassign_master(
    State(app_state): State<AppState>,
    Path(code): Path<String>,
    Query(query): Query<UnassignQuery>,
) -> Response {
    let db = app_state.db();
    let ticket = match find_ticket(db, &code).await {
        Ok(ticket) => ticket,
        Err(e) => return e.into_response(),
    };

    match workflow::unassign(db, ticket.id, query.reason).await {
        Ok(ticket) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                TicketResponse::from(ticket),
                "Master unassigned successfully",
            )),
        )
            .into_response(),
        Err(e) => workflow_error(e).into_response(),
    }
}
