use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::user::{Model as UserModel, UserFilter};
use db::statistics;
use serde::Deserialize;
use util::state::AppState;

use super::common::{find_user, parse_role};
use crate::response::ApiResponse;
use crate::routes::common::db_error;

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub role: Option<String>,
    pub is_active: Option<bool>,
    pub query: Option<String>,
}

/// GET /api/users
///
/// ### Query Parameters
/// - `role` (optional): `admin`, `director`, `manager` or `master`
/// - `is_active` (optional)
/// - `query` (optional): username, full name or email substring
///
/// Newest accounts first.
pub async fn list_users(
    State(app_state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Response {
    let role = match query.role.as_deref().map(parse_role).transpose() {
        Ok(role) => role,
        Err(e) => return e.into_response(),
    };

    let filter = UserFilter {
        role,
        is_active: query.is_active,
        query: query.query,
    };

    match UserModel::list(app_state.db(), filter).await {
        Ok(users) => (
            StatusCode::OK,
            Json(ApiResponse::success(users, "Users retrieved successfully")),
        )
            .into_response(),
        Err(e) => db_error("Failed to list users", e).into_response(),
    }
}

/// GET /api/users/statistics
pub async fn get_statistics(State(app_state): State<AppState>) -> Response {
    match statistics::users(app_state.db()).await {
        Ok(stats) => (
            StatusCode::OK,
            Json(ApiResponse::success(stats, "User statistics retrieved")),
        )
            .into_response(),
        Err(e) => db_error("Failed to compute user statistics", e).into_response(),
    }
}

/// GET /api/users/{id}
pub async fn get_user(State(app_state): State<AppState>, Path(id): Path<i64>) -> Response {
    match find_user(app_state.db(), id).await {
        Ok(user) => (
            StatusCode::OK,
            Json(ApiResponse::success(user, "User retrieved successfully")),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
