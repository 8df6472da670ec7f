use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use db::models::user::{Model as UserModel, Role};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use util::state::AppState;
use validator::Validate;

use crate::auth::{clear_session, generate_jwt, session_cookie};
use crate::response::{ApiResponse, api_error};
use crate::routes::common::{db_error, validation_error};

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub id: i64,
    pub username: String,
    pub full_name: String,
    pub role: Role,
    pub token: String,
    pub expires_at: String,
}

/// POST /api/auth/login
///
/// Verifies the password, records the login time and issues a JWT. The token is
/// returned in the body and also set as the `access_token` HttpOnly cookie.
///
/// ### Request Body
/// ```json
/// { "username": "olga", "password": "secret-pass" }
/// ```
///
/// ### Responses
/// - `200 OK` with `{ id, username, full_name, role, token, expires_at }`
/// - `400 Bad Request` (missing fields)
/// - `401 Unauthorized` (unknown user, wrong password or deactivated account)
pub async fn login(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Response {
    if let Err(e) = req.validate() {
        return validation_error(&e).into_response();
    }

    let user = match UserModel::verify_credentials(app_state.db(), req.username.trim(), &req.password).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            warn!(username = %req.username, "Failed login attempt");
            return api_error(StatusCode::UNAUTHORIZED, "Invalid username or password")
                .into_response();
        }
        Err(e) => return db_error("Login lookup failed", e).into_response(),
    };

    let (token, expires_at) = match generate_jwt(user.id, &user.username, user.role) {
        Ok(pair) => pair,
        Err(e) => {
            tracing::error!(error = %e, "Token encoding failed");
            return api_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
                .into_response();
        }
    };

    info!(user_id = user.id, role = %user.role, "User logged in");

    let body = LoginResponse {
        id: user.id,
        username: user.username,
        full_name: user.full_name,
        role: user.role,
        token: token.clone(),
        expires_at,
    };

    (
        StatusCode::OK,
        jar.add(session_cookie(token)),
        Json(ApiResponse::success(body, "Login successful")),
    )
        .into_response()
}

/// POST /api/auth/logout
///
/// Clears the session cookie. Bearer tokens stay valid until they expire.
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (
        StatusCode::OK,
        clear_session(jar),
        Json(ApiResponse::<()>::success((), "Logged out")),
    )
}
