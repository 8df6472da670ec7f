use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::client::Model as ClientModel;
use tracing::info;
use util::state::AppState;

use super::get::find_client;
use crate::response::{ApiResponse, api_error};
use crate::routes::common::db_error;

/// DELETE /api/clients/{id}
///
/// Removes a client together with its finished or archived tickets.
///
/// ### Responses
/// - `200 OK`
/// - `404 Not Found`
/// - `409 Conflict` (the client still has tickets in progress)
pub async fn delete_client(State(app_state): State<AppState>, Path(id): Path<i64>) -> Response {
    let db = app_state.db();
    if let Err(e) = find_client(db, id).await {
        return e.into_response();
    }

    match ClientModel::delete_if_idle(db, id).await {
        Ok(true) => {
            info!(client_id = id, "Client deleted");
            (
                StatusCode::OK,
                Json(ApiResponse::success((), "Client deleted successfully")),
            )
                .into_response()
        }
        Ok(false) => api_error(
            StatusCode::CONFLICT,
            "Client has tickets in progress and cannot be deleted",
        )
        .into_response(),
        Err(e) => db_error("Failed to delete client", e).into_response(),
    }
}
