use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::user::{Model as UserModel, Role, UserChanges};
use serde::Deserialize;
use util::state::AppState;
use validator::Validate;

use super::common::{ensure_not_last_admin, find_user, parse_role};
use crate::auth::AuthUser;
use crate::response::{ApiResponse, api_error};
use crate::routes::common::{db_error, is_unique_violation, validation_error};

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(min = 2, max = 200, message = "Full name must be 2-200 characters"))]
    pub full_name: Option<String>,

    #[validate(length(max = 30))]
    pub phone: Option<String>,

    pub role: Option<String>,

    pub is_active: Option<bool>,

    #[validate(length(max = 200))]
    pub specialization: Option<String>,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
}

/// PUT /api/users/{id}
///
/// Partial update; omitted fields are left untouched.
///
/// ### Responses
/// - `200 OK` with the updated user
/// - `400 Bad Request`
/// - `403 Forbidden` (changing your own role or active flag)
/// - `404 Not Found`
/// - `409 Conflict` (email in use, or the change would leave no active administrator)
pub async fn update_user(
    State(app_state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> Response {
    if let Err(e) = req.validate() {
        return validation_error(&e).into_response();
    }

    let role = match req.role.as_deref().map(parse_role).transpose() {
        Ok(role) => role,
        Err(e) => return e.into_response(),
    };

    if id == caller.id() && (role.is_some_and(|r| r != caller.role()) || req.is_active == Some(false)) {
        return api_error(
            StatusCode::FORBIDDEN,
            "You cannot change your own role or deactivate yourself",
        )
        .into_response();
    }

    let db = app_state.db();
    let target = match find_user(db, id).await {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };

    let loses_admin = req.is_active == Some(false)
        || role.is_some_and(|r| !Role::ADMINS.contains(&r));
    if loses_admin {
        if let Err(e) = ensure_not_last_admin(db, &target).await {
            return e.into_response();
        }
    }

    if let Some(email) = req.email.as_deref() {
        match UserModel::email_taken(db, email.trim(), Some(id)).await {
            Ok(true) => {
                return api_error(StatusCode::CONFLICT, "A user with this email already exists")
                    .into_response();
            }
            Ok(false) => {}
            Err(e) => return db_error("Failed to check email", e).into_response(),
        }
    }

    let changes = UserChanges {
        email: req.email,
        full_name: req.full_name,
        phone: req.phone,
        role,
        is_active: req.is_active,
        specialization: req.specialization,
        password: req.password,
    };

    match UserModel::update_profile(db, id, changes).await {
        Ok(user) => (
            StatusCode::OK,
            Json(ApiResponse::success(user, "User updated successfully")),
        )
            .into_response(),
        Err(e) if is_unique_violation(&e) => {
            api_error(StatusCode::CONFLICT, "A user with this email already exists").into_response()
        }
        Err(e) => db_error("Failed to update user", e).into_response(),
    }
}
