pub mod auth;
pub mod pages;
pub mod response;
pub mod routes;

use axum::{Router, middleware::from_fn};
use util::state::AppState;

use crate::auth::policy::enforce_access_policy;
use crate::pages::pages_routes;
use crate::routes::routes;

/// Assembles the application: the JSON API under `/api`, the dashboard pages,
/// and the access policy in front of all of them.
///
/// Request logging and CORS are added by the binary so tests can drive the
/// router without a socket.
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api", routes())
        .merge(pages_routes())
        .layer(from_fn(enforce_access_policy))
        .with_state(state)
}
