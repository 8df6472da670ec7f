use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::client::{Model as ClientModel, NewClient};
use serde::Deserialize;
use util::state::AppState;
use validator::Validate;

use crate::response::{ApiResponse, api_error};
use crate::routes::common::{db_error, is_unique_violation, validation_error};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateClientRequest {
    #[validate(length(min = 2, max = 200, message = "Full name must be 2-200 characters"))]
    pub full_name: String,

    #[validate(length(min = 5, max = 30, message = "Phone must be 5-30 characters"))]
    pub phone: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(max = 500))]
    pub address: Option<String>,

    #[serde(default)]
    pub is_vip: bool,

    pub notes: Option<String>,
}

/// POST /api/clients
///
/// ### Responses
/// - `201 Created` with the client
/// - `400 Bad Request`
/// - `409 Conflict` (phone already registered)
pub async fn create_client(
    State(app_state): State<AppState>,
    Json(req): Json<CreateClientRequest>,
) -> Response {
    if let Err(e) = req.validate() {
        return validation_error(&e).into_response();
    }

    let db = app_state.db();
    match ClientModel::get_by_phone(db, &req.phone).await {
        Ok(Some(_)) => {
            return api_error(
                StatusCode::CONFLICT,
                "A client with this phone number already exists",
            )
            .into_response();
        }
        Ok(None) => {}
        Err(e) => return db_error("Failed to check client phone", e).into_response(),
    }

    let new = NewClient {
        full_name: req.full_name,
        phone: req.phone,
        email: req.email,
        address: req.address,
        is_vip: req.is_vip,
        notes: req.notes,
    };

    match ClientModel::create(db, new).await {
        Ok(client) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(client, "Client created successfully")),
        )
            .into_response(),
        Err(e) if is_unique_violation(&e) => api_error(
            StatusCode::CONFLICT,
            "A client with this phone number already exists",
        )
        .into_response(),
        Err(e) => db_error("Failed to create client", e).into_response(),
    }
}
