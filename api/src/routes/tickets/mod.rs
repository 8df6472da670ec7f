//! # tickets Routes Module
//!
//! Routes for the `/api/tickets` group.
//!
//! - `get.rs` — listing, detail, public status lookup, history and assignment ledger
//! - `post.rs` — intake, archiving and technician assignment
//! - `put.rs` — field edits and status transitions
//! - `delete.rs` — technician unassignment
//! - `common.rs` — response types and ticket lookup
//!
//! Tickets are addressed by their public code (`RQ3FA09C`).

pub mod common;
pub mod delete;
pub mod get;
pub mod post;
pub mod put;

use axum::{
    Router,
    routing::{get, post},
};
use util::state::AppState;

/// Builds the `/tickets` route group.
///
/// - `POST /tickets` → `create_ticket` (public)
/// - `GET /tickets/{code}/status` → `get_public_status` (public)
/// - `GET /tickets` → `list_tickets`
/// - `GET /tickets/{code}` → `get_ticket`
/// - `PUT /tickets/{code}` → `update_ticket`
/// - `PUT /tickets/{code}/status` → `update_status`
/// - `POST /tickets/{code}/archive` → `archive_ticket`
/// - `POST /tickets/{code}/assign-master` → `assign_master`
/// - `DELETE /tickets/{code}/assign-master` → `unassign_master`
/// - `GET /tickets/{code}/history` → `get_history`
/// - `GET /tickets/{code}/assignments` → `get_assignments`
pub fn tickets_routes() -> Router<AppState> {
    Router::new()
        .route("/tickets", get(get::list_tickets).post(post::create_ticket))
        .route("/tickets/{code}", get(get::get_ticket).put(put::update_ticket))
        .route("/tickets/{code}/status", get(get::get_public_status).put(put::update_status))
        .route("/tickets/{code}/archive", post(post::archive_ticket))
        .route(
            "/tickets/{code}/assign-master",
            post(post::assign_master).delete(delete::unassign_master),
        )
        .route("/tickets/{code}/history", get(get::get_history))
        .route("/tickets/{code}/assignments", get(get::get_assignments))
}
