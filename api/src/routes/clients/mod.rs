//! # clients Routes Module
//!
//! Client records under `/api/clients`.
//!
//! - `get.rs` — search, statistics, VIP list, detail, ticket list
//! - `post.rs` — creation
//! - `put.rs` — edits
//! - `delete.rs` — removal of idle clients

pub mod delete;
pub mod get;
pub mod post;
pub mod put;

use axum::{Router, routing::get};
use util::state::AppState;

/// Builds the `/clients` route group.
///
/// - `GET /clients` → `list_clients`
/// - `POST /clients` → `create_client`
/// - `GET /clients/statistics` → `get_statistics`
/// - `GET /clients/vip` → `list_vip`
/// - `GET /clients/{id}` → `get_client`
/// - `PUT /clients/{id}` → `update_client`
/// - `DELETE /clients/{id}` → `delete_client`
/// - `GET /clients/{id}/tickets` → `get_client_tickets`
pub fn clients_routes() -> Router<AppState> {
    Router::new()
        .route("/clients", get(get::list_clients).post(post::create_client))
        .route("/clients/statistics", get(get::get_statistics))
        .route("/clients/vip", get(get::list_vip))
        .route(
            "/clients/{id}",
            get(get::get_client)
                .put(put::update_client)
                .delete(delete::delete_client),
        )
        .route("/clients/{id}/tickets", get(get::get_client_tickets))
}
