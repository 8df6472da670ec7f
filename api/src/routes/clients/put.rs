use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::client::{ClientChanges, Model as ClientModel};
use sea_orm::DbErr;
use serde::Deserialize;
use util::state::AppState;
use validator::Validate;

use crate::response::{ApiResponse, api_error};
use crate::routes::common::{db_error, is_unique_violation, validation_error};

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateClientRequest {
    #[validate(length(min = 2, max = 200, message = "Full name must be 2-200 characters"))]
    pub full_name: Option<String>,

    #[validate(length(min = 5, max = 30, message = "Phone must be 5-30 characters"))]
    pub phone: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(max = 500))]
    pub address: Option<String>,

    pub is_vip: Option<bool>,

    pub notes: Option<String>,
}

/// PUT /api/clients/{id}
///
/// ### Responses
/// - `200 OK` with the updated client
/// - `400 Bad Request` (validation failure, empty body)
/// - `404 Not Found`
/// - `409 Conflict` (phone belongs to another client)
pub async fn update_client(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateClientRequest>,
) -> Response {
    if let Err(e) = req.validate() {
        return validation_error(&e).into_response();
    }

    let changes = ClientChanges {
        full_name: req.full_name,
        phone: req.phone,
        email: req.email,
        address: req.address,
        is_vip: req.is_vip,
        notes: req.notes,
    };
    if changes.is_empty() {
        return api_error(StatusCode::BAD_REQUEST, "No fields to update").into_response();
    }

    match ClientModel::update_fields(app_state.db(), id, changes).await {
        Ok(client) => (
            StatusCode::OK,
            Json(ApiResponse::success(client, "Client updated successfully")),
        )
            .into_response(),
        Err(DbErr::RecordNotFound(_)) => {
            api_error(StatusCode::NOT_FOUND, "Client not found").into_response()
        }
        Err(e) if is_unique_violation(&e) => api_error(
            StatusCode::CONFLICT,
            "A client with this phone number already exists",
        )
        .into_response(),
        Err(e) => db_error("Failed to update client", e).into_response(),
    }
}
