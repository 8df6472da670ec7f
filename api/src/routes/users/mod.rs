//! # users Routes Module
//!
//! Staff account management under `/api/users`.
//!
//! - `get.rs` — listing, statistics, single user
//! - `post.rs` — creation, activation and deactivation
//! - `put.rs` — profile edits
//! - `delete.rs` — removal
//! - `common.rs` — shared lookups and the last-administrator guard

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

/// Builds the `/users` route group. Access is restricted to admins and directors
/// by the access policy.
///
/// - `GET /users` → `list_users`
/// - `POST /users` → `create_user`
/// - `GET /users/statistics` → `get_statistics`
/// - `GET /users/{id}` → `get_user`
/// - `PUT /users/{id}` → `update_user`
/// - `DELETE /users/{id}` → `delete_user`
/// - `POST /users/{id}/activate` → `activate_user`
/// - `POST /users/{id}/deactivate` → `deactivate_user`
pub fn users_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(get::list_users).post(post::create_user))
        .route("/users/statistics", get(get::get_statistics))
        .route(
            "/users/{id}",
            get(get::get_user)
                .put(put::update_user)
                .delete(delete::delete_user),
        )
        .route("/users/{id}/activate", post(post::activate_user))
        .route("/users/{id}/deactivate", post(post::deactivate_user))
}
