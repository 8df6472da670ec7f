use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::technician_skill::Model as SkillModel;
use db::models::user::Model as UserModel;
use db::workflow;
use serde::Serialize;
use util::state::AppState;

use crate::response::{ApiError, ApiResponse, api_error};
use crate::routes::common::{db_error, workflow_error};
use sea_orm::DatabaseConnection;

#[derive(Debug, Serialize)]
pub struct MasterResponse {
    pub id: i64,
    pub username: String,
    pub full_name: String,
    pub specialization: Option<String>,
    pub active_ticket_count: i32,
    pub max_concurrent_tickets: i32,
    pub is_available: bool,
    pub has_capacity: bool,
}

impl From<UserModel> for MasterResponse {
    fn from(user: UserModel) -> Self {
        Self {
            has_capacity: user.has_capacity(),
            id: user.id,
            username: user.username,
            full_name: user.full_name,
            specialization: user.specialization,
            active_ticket_count: user.active_ticket_count,
            max_concurrent_tickets: user.max_concurrent_tickets,
            is_available: user.is_available,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SkillResponse {
    pub name: String,
    pub level: i32,
}

impl From<SkillModel> for SkillResponse {
    fn from(skill: SkillModel) -> Self {
        Self {
            name: skill.name,
            level: skill.level,
        }
    }
}

/// Loads a user and checks it is a technician.
pub(super) async fn find_master(db: &DatabaseConnection, id: i64) -> Result<UserModel, ApiError> {
    match UserModel::get_by_id(db, id).await {
        Ok(Some(user)) if user.is_technician() => Ok(user),
        Ok(Some(_)) => Err(api_error(
            StatusCode::BAD_REQUEST,
            "User is not a master",
        )),
        Ok(None) => Err(api_error(StatusCode::NOT_FOUND, "Master not found")),
        Err(e) => Err(db_error("Failed to load master", e)),
    }
}

/// GET /api/masters/available
///
/// Active technicians flagged as available, least loaded first. `has_capacity`
/// tells whether the stored active count is below the technician's maximum.
pub async fn list_available(State(app_state): State<AppState>) -> Response {
    match UserModel::available_technicians(app_state.db()).await {
        Ok(masters) => {
            let data: Vec<MasterResponse> = masters.into_iter().map(MasterResponse::from).collect();
            (
                StatusCode::OK,
                Json(ApiResponse::success(data, "Available masters retrieved")),
            )
                .into_response()
        }
        Err(e) => db_error("Failed to list available masters", e).into_response(),
    }
}

/// GET /api/masters/{id}/workload
///
/// Active queue ordered by priority rank then age, plus 30-day figures.
///
/// ### Responses
/// - `200 OK`
/// - `400 Bad Request` (user is not a master)
/// - `404 Not Found`
pub async fn get_workload(State(app_state): State<AppState>, Path(id): Path<i64>) -> Response {
    match workflow::workload(app_state.db(), id).await {
        Ok(workload) => (
            StatusCode::OK,
            Json(ApiResponse::success(workload, "Workload retrieved")),
        )
            .into_response(),
        Err(e) => workflow_error(e).into_response(),
    }
}

/// GET /api/masters/{id}/skills
pub async fn get_skills(State(app_state): State<AppState>, Path(id): Path<i64>) -> Response {
    let db = app_state.db();
    if let Err(e) = find_master(db, id).await {
        return e.into_response();
    }

    match SkillModel::for_user(db, id).await {
        Ok(skills) => {
            let data: Vec<SkillResponse> = skills.into_iter().map(SkillResponse::from).collect();
            (
                StatusCode::OK,
                Json(ApiResponse::success(data, "Skills retrieved")),
            )
                .into_response()
        }
        Err(e) => db_error("Failed to load skills", e).into_response(),
    }
}
