use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::user::{Model as UserModel, NewUser};
use serde::Deserialize;
use tracing::info;
use util::state::AppState;
use validator::Validate;

use super::common::{ensure_not_last_admin, find_user, parse_role};
use crate::auth::AuthUser;
use crate::response::{ApiResponse, api_error};
use crate::routes::common::{db_error, is_unique_violation, validation_error};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(length(min = 2, max = 200, message = "Full name must be 2-200 characters"))]
    pub full_name: String,

    #[validate(length(max = 30))]
    pub phone: Option<String>,

    pub role: String,

    #[validate(length(max = 200))]
    pub specialization: Option<String>,
}

/// POST /api/users
///
/// ### Request Body
/// ```json
/// {
///   "username": "petrov",
///   "email": "petrov@service-center.local",
///   "password": "s3cret-pass",
///   "full_name": "Ivan Petrov",
///   "role": "master",
///   "specialization": "Laptops"
/// }
/// ```
///
/// ### Responses
/// - `201 Created` with the new user
/// - `400 Bad Request` (validation failure, unknown role)
/// - `409 Conflict` (username or email already in use)
pub async fn create_user(
    State(app_state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Response {
    if let Err(e) = req.validate() {
        return validation_error(&e).into_response();
    }

    let role = match parse_role(&req.role) {
        Ok(role) => role,
        Err(e) => return e.into_response(),
    };

    let db = app_state.db();
    let username = req.username.trim().to_owned();

    match UserModel::username_taken(db, &username).await {
        Ok(true) => {
            return api_error(StatusCode::CONFLICT, "A user with this username already exists")
                .into_response();
        }
        Ok(false) => {}
        Err(e) => return db_error("Failed to check username", e).into_response(),
    }
    match UserModel::email_taken(db, req.email.trim(), None).await {
        Ok(true) => {
            return api_error(StatusCode::CONFLICT, "A user with this email already exists")
                .into_response();
        }
        Ok(false) => {}
        Err(e) => return db_error("Failed to check email", e).into_response(),
    }

    let new = NewUser {
        username,
        email: req.email,
        password: req.password,
        full_name: req.full_name,
        phone: req.phone,
        role,
        specialization: req.specialization,
    };

    match UserModel::create(db, new).await {
        Ok(user) => {
            info!(user_id = user.id, role = %user.role, "User created");
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(user, "User created successfully")),
            )
                .into_response()
        }
        Err(e) if is_unique_violation(&e) => {
            api_error(StatusCode::CONFLICT, "Username or email already in use").into_response()
        }
        Err(e) => db_error("Failed to create user", e).into_response(),
    }
}

/// POST /api/users/{id}/activate
pub async fn activate_user(State(app_state): State<AppState>, Path(id): Path<i64>) -> Response {
    let db = app_state.db();
    if let Err(e) = find_user(db, id).await {
        return e.into_response();
    }

    match UserModel::set_active(db, id, true).await {
        Ok(user) => (
            StatusCode::OK,
            Json(ApiResponse::success(user, "User activated successfully")),
        )
            .into_response(),
        Err(e) => db_error("Failed to activate user", e).into_response(),
    }
}

/// POST /api/users/{id}/deactivate
///
/// Inactive users can no longer log in. Tokens already issued stay valid until
/// they expire.
///
/// ### Responses
/// - `200 OK`
/// - `403 Forbidden` (deactivating yourself)
/// - `404 Not Found`
/// - `409 Conflict` (last active administrator)
pub async fn deactivate_user(
    State(app_state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Response {
    if id == caller.id() {
        return api_error(StatusCode::FORBIDDEN, "You cannot deactivate your own account")
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

    match UserModel::set_active(db, id, false).await {
        Ok(user) => {
            info!(user_id = id, by = caller.id(), "User deactivated");
            (
                StatusCode::OK,
                Json(ApiResponse::success(user, "User deactivated successfully")),
            )
                .into_response()
        }
        Err(e) => db_error("Failed to deactivate user", e).into_response(),
    }
}
