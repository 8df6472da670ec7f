use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::technician_skill::Model as SkillModel;
use db::models::user::Model as UserModel;
use serde::Deserialize;
use util::state::AppState;
use validator::Validate;

use super::get::{MasterResponse, SkillResponse, find_master};
use crate::response::ApiResponse;
use crate::routes::common::{db_error, validation_error};

#[derive(Debug, Deserialize, Validate)]
pub struct SkillInput {
    #[validate(length(min = 1, max = 100, message = "Skill name must be 1-100 characters"))]
    pub name: String,
    #[validate(range(min = 1, max = 5, message = "Skill level must be between 1 and 5"))]
    pub level: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReplaceSkillsRequest {
    #[validate(nested)]
    pub skills: Vec<SkillInput>,
}

/// PUT /api/masters/{id}/skills
///
/// Replaces the technician's whole skill set.
///
/// ### Request Body
/// ```json
/// { "skills": [ { "name": "Soldering", "level": 5 }, { "name": "Laptops", "level": 3 } ] }
/// ```
///
/// ### Responses
/// - `200 OK` with the stored skills
/// - `400 Bad Request` (level outside 1-5, user is not a master)
/// - `404 Not Found`
pub async fn replace_skills(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<ReplaceSkillsRequest>,
) -> Response {
    if let Err(e) = req.validate() {
        return validation_error(&e).into_response();
    }

    let db = app_state.db();
    if let Err(e) = find_master(db, id).await {
        return e.into_response();
    }

    let skills = req.skills.into_iter().map(|s| (s.name, s.level)).collect();
    match SkillModel::replace_for_user(db, id, skills).await {
        Ok(skills) => {
            let data: Vec<SkillResponse> = skills.into_iter().map(SkillResponse::from).collect();
            (
                StatusCode::OK,
                Json(ApiResponse::success(data, "Skills updated successfully")),
            )
                .into_response()
        }
        Err(e) => db_error("Failed to replace skills", e).into_response(),
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct AvailabilityRequest {
    pub is_available: Option<bool>,
    #[validate(range(min = 1, max = 50, message = "Max concurrent tickets must be between 1 and 50"))]
    pub max_concurrent_tickets: Option<i32>,
}

/// PUT /api/masters/{id}/availability
///
/// ### Request Body
/// ```json
/// { "is_available": false, "max_concurrent_tickets": 8 }
/// ```
pub async fn update_availability(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<AvailabilityRequest>,
) -> Response {
    if let Err(e) = req.validate() {
        return validation_error(&e).into_response();
    }

    let db = app_state.db();
    if let Err(e) = find_master(db, id).await {
        return e.into_response();
    }

    match UserModel::set_availability(db, id, req.is_available, req.max_concurrent_tickets).await {
        Ok(user) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                MasterResponse::from(user),
                "Availability updated successfully",
            )),
        )
            .into_response(),
        Err(e) => db_error("Failed to update availability", e).into_response(),
    }
}
