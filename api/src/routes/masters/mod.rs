//! # masters Routes Module
//!
//! Technician views and settings.
//!
//! - `get.rs` — available technicians, workload, skills
//! - `put.rs` — skill set and availability updates

pub mod get;
pub mod put;

use axum::{Router, routing::get};
use util::state::AppState;

/// Builds the `/masters` route group.
///
/// - `GET /masters/available` → `list_available`
/// - `GET /masters/{id}/workload` → `get_workload`
/// - `GET /masters/{id}/skills` → `get_skills`
/// - `PUT /masters/{id}/skills` → `replace_skills`
/// - `PUT /masters/{id}/availability` → `update_availability`
pub fn masters_routes() -> Router<AppState> {
    Router::new()
        .route("/masters/available", get(get::list_available))
        .route("/masters/{id}/workload", get(get::get_workload))
        .route(
            "/masters/{id}/skills",
            get(get::get_skills).put(put::replace_skills),
        )
        .route(
            "/masters/{id}/availability",
            axum::routing::put(put::update_availability),
        )
}
