use axum::http::StatusCode;
use db::models::user::{Model as UserModel, Role};
use sea_orm::DatabaseConnection;

use crate::response::{ApiError, api_error};
use crate::routes::common::db_error;

pub async fn find_user(db: &DatabaseConnection, id: i64) -> Result<UserModel, ApiError> {
    match UserModel::get_by_id(db, id).await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(api_error(StatusCode::NOT_FOUND, "User not found")),
        Err(e) => Err(db_error("Failed to load user", e)),
    }
}

pub fn parse_role(value: &str) -> Result<Role, ApiError> {
    value.parse::<Role>().map_err(|_| {
        api_error(
            StatusCode::BAD_REQUEST,
            format!("Invalid role '{value}'. Expected one of: admin, director, manager, master"),
        )
    })
}

/// Refuses to remove the last active admin or director from the administrators.
///
/// `target` is the account about to lose its administrative standing
/// (deleted, deactivated or demoted).
pub async fn ensure_not_last_admin(
    db: &DatabaseConnection,
    target: &UserModel,
) -> Result<(), ApiError> {
    if !target.is_active || !Role::ADMINS.contains(&target.role) {
        return Ok(());
    }

    match UserModel::count_active_with_roles(db, Role::ADMINS).await {
        Ok(count) if count <= 1 => Err(api_error(
            StatusCode::CONFLICT,
            "Cannot remove the last active administrator",
        )),
        Ok(_) => Ok(()),
        Err(e) => Err(db_error("Failed to count administrators", e)),
    }
}
