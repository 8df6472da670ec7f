use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::client::{ClientTicketStats, Model as ClientModel};
use db::models::repair_ticket::Model as TicketModel;
use db::statistics;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use util::state::AppState;

use crate::response::{ApiError, ApiResponse, api_error};
use crate::routes::common::db_error;
use crate::routes::tickets::common::TicketResponse;

pub(super) async fn find_client(db: &DatabaseConnection, id: i64) -> Result<ClientModel, ApiError> {
    match ClientModel::get_by_id(db, id).await {
        Ok(Some(client)) => Ok(client),
        Ok(None) => Err(api_error(StatusCode::NOT_FOUND, "Client not found")),
        Err(e) => Err(db_error("Failed to load client", e)),
    }
}

#[derive(Debug, Deserialize)]
pub struct ListClientsQuery {
    pub query: Option<String>,
}

/// GET /api/clients
///
/// ### Query Parameters
/// - `query` (optional): name, phone or email substring
pub async fn list_clients(
    State(app_state): State<AppState>,
    Query(query): Query<ListClientsQuery>,
) -> Response {
    match ClientModel::search(app_state.db(), query.query.as_deref()).await {
        Ok(clients) => (
            StatusCode::OK,
            Json(ApiResponse::success(clients, "Clients retrieved successfully")),
        )
            .into_response(),
        Err(e) => db_error("Failed to list clients", e).into_response(),
    }
}

/// GET /api/clients/statistics
pub async fn get_statistics(State(app_state): State<AppState>) -> Response {
    match statistics::clients(app_state.db()).await {
        Ok(stats) => (
            StatusCode::OK,
            Json(ApiResponse::success(stats, "Client statistics retrieved")),
        )
            .into_response(),
        Err(e) => db_error("Failed to compute client statistics", e).into_response(),
    }
}

/// GET /api/clients/vip
pub async fn list_vip(State(app_state): State<AppState>) -> Response {
    match ClientModel::vip(app_state.db()).await {
        Ok(clients) => (
            StatusCode::OK,
            Json(ApiResponse::success(clients, "VIP clients retrieved")),
        )
            .into_response(),
        Err(e) => db_error("Failed to list VIP clients", e).into_response(),
    }
}

#[derive(Debug, Serialize)]
pub struct ClientDetailResponse {
    #[serde(flatten)]
    pub client: ClientModel,
    pub stats: ClientTicketStats,
}

/// GET /api/clients/{id}
///
/// The client together with ticket totals: count, active count, amount spent and
/// the distinct device types brought in.
pub async fn get_client(State(app_state): State<AppState>, Path(id): Path<i64>) -> Response {
    let db = app_state.db();
    let client = match find_client(db, id).await {
        Ok(client) => client,
        Err(e) => return e.into_response(),
    };

    match ClientModel::ticket_stats(db, id).await {
        Ok(stats) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                ClientDetailResponse { client, stats },
                "Client retrieved successfully",
            )),
        )
            .into_response(),
        Err(e) => db_error("Failed to compute client ticket totals", e).into_response(),
    }
}

/// GET /api/clients/{id}/tickets
///
/// Every ticket of the client, archived ones included, newest first.
pub async fn get_client_tickets(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Response {
    let db = app_state.db();
    if let Err(e) = find_client(db, id).await {
        return e.into_response();
    }

    match TicketModel::for_client(db, id).await {
        Ok(tickets) => {
            let data: Vec<TicketResponse> = tickets.into_iter().map(TicketResponse::from).collect();
            (
                StatusCode::OK,
                Json(ApiResponse::success(data, "Client tickets retrieved")),
            )
                .into_response()
        }
        Err(e) => db_error("Failed to list client tickets", e).into_response(),
    }
}
