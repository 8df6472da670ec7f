use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::user::Model as UserModel;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::{ApiResponse, api_error};
use crate::routes::common::db_error;

/// GET /api/auth/profile
///
/// Returns the stored profile of the token holder.
///
/// ### Responses
/// - `200 OK` with the user record (no password hash)
/// - `401 Unauthorized` (missing or invalid token)
/// - `404 Not Found` (account deleted after the token was issued)
pub async fn get_profile(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Response {
    match UserModel::get_by_id(app_state.db(), user.id()).await {
        Ok(Some(profile)) => (
            StatusCode::OK,
            Json(ApiResponse::success(profile, "Profile retrieved successfully")),
        )
            .into_response(),
        Ok(None) => api_error(StatusCode::NOT_FOUND, "User not found").into_response(),
        Err(e) => db_error("Failed to load profile", e).into_response(),
    }
}
