use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::user::{Model as UserModel, UserDeletion};
use tracing::info;
use util::state::AppState;

use super::common::{ensure_not_last_admin, find_user};
use crate::auth::AuthUser;
use crate::response::{ApiResponse, api_error};
use crate::routes::common::db_error;

/// DELETE /api/users/{id}
///
/// ### Responses
/// - `200 OK`
/// ```json
/// { "success": true, "data": null, "message": "User deleted successfully" }
/// ```
/// - `403 Forbidden` (deleting your own account)
/// - `404 Not Found`
/// - `409 Conflict` (last active administrator, or a technician with assignment history)
pub async fn delete_user(
    State(app_state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Response {
    if id == caller.id() {
        return api_error(StatusCode::FORBIDDEN, "You cannot delete your own account")
            .into_response();
    }

    let db = app_state.db();
    let target = match find_user(db, id).await {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };
    if let Err(e) = ensure_not_last_admin(db, &target).await {
        return e.into_response();
    }

    match UserModel::delete_by_id(db, id).await {
        Ok(UserDeletion::Deleted) => {
            info!(user_id = id, by = caller.id(), "User deleted");
            (
                StatusCode::OK,
                Json(ApiResponse::success((), "User deleted successfully")),
            )
                .into_response()
        }
        Ok(UserDeletion::NotFound) => {
            api_error(StatusCode::NOT_FOUND, "User not found").into_response()
        }
        Ok(UserDeletion::HasAssignmentHistory) => api_error(
            StatusCode::CONFLICT,
            "User has assignment history and cannot be deleted; deactivate the account instead",
        )
        .into_response(),
        Err(e) => db_error("Failed to delete user", e).into_response(),
    }
}
