//! # auth Routes Module
//!
//! Routes for the `/api/auth` group.
//!
//! - `post.rs` — login and logout
//! - `get.rs` — profile of the current user

pub mod get;
pub mod post;

use axum::{
    Router,
    routing::{get, post},
};
use util::state::AppState;

use get::get_profile;
use post::{login, logout};

/// Builds the `/auth` route group.
///
/// - `POST /auth/login` → `login` (public)
/// - `POST /auth/logout` → `logout` (public)
/// - `GET /auth/profile` → `get_profile` (any valid token)
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/profile", get(get_profile))
}
