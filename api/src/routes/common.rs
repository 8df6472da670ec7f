//! Response helpers shared by the route groups.

use axum::http::StatusCode;
use db::models::user::Model as UserModel;
use db::workflow::WorkflowError;
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use validator::ValidationErrors;

use crate::response::{ApiError, api_error};

/// Minimal staff reference embedded in other payloads.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct StaffBrief {
    pub id: i64,
    pub username: String,
    pub full_name: String,
}

impl From<UserModel> for StaffBrief {
    fn from(user: UserModel) -> Self {
        Self {
            id: user.id,
            username: user.username,
            full_name: user.full_name,
        }
    }
}

pub fn validation_error(errors: &ValidationErrors) -> ApiError {
    api_error(
        StatusCode::BAD_REQUEST,
        common::format_validation_errors(errors),
    )
}

/// Logs the store failure and hides it behind a generic `500`.
pub fn db_error(context: &str, err: DbErr) -> ApiError {
    tracing::error!(error = %err, "{context}");
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

pub fn workflow_error(err: WorkflowError) -> ApiError {
    match err {
        WorkflowError::NotFound(message) => api_error(StatusCode::NOT_FOUND, message),
        WorkflowError::Validation(message) => api_error(StatusCode::BAD_REQUEST, message),
        WorkflowError::NoCurrentAssignment => api_error(StatusCode::CONFLICT, err.to_string()),
        WorkflowError::Db(e) => db_error("Workflow operation failed", e),
    }
}
