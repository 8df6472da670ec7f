//! HTTP route entry point for `/api/...`.
//!
//! Route groups are organized by domain and declare full paths relative to
//! `/api`. Access control is not attached here: every matched route is checked
//! against [`crate::auth::policy::POLICY`] by the application-wide middleware.
//!
//! Route groups:
//! - `/health` → health check
//! - `/auth` → login, logout, profile
//! - `/tickets` → intake, public status lookup, workflow operations
//! - `/masters` → technician availability, workload and skills
//! - `/clients` → client records
//! - `/users` → staff accounts
//! - `/stats` → dashboard statistics

use axum::Router;
use util::state::AppState;

use crate::routes::{
    auth::auth_routes, clients::clients_routes, health::health_routes, masters::masters_routes,
    stats::stats_routes, tickets::tickets_routes, users::users_routes,
};

pub mod auth;
pub mod clients;
pub mod common;
pub mod health;
pub mod masters;
pub mod stats;
pub mod tickets;
pub mod users;

/// Builds every JSON API route. The result is nested under `/api` by [`crate::app`].
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health_routes())
        .merge(auth_routes())
        .merge(tickets_routes())
        .merge(masters_routes())
        .merge(clients_routes())
        .merge(users_routes())
        .merge(stats_routes())
}
