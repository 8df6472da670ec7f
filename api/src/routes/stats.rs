use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use db::statistics;
use util::state::AppState;

use crate::response::ApiResponse;
use crate::routes::common::db_error;

/// Builds the stats route: `GET /stats`, staff only.
pub fn stats_routes() -> Router<AppState> {
    Router::new().route("/stats", get(get_dashboard_stats))
}

/// GET /api/stats
///
/// ```json
/// {
///   "success": true,
///   "data": {
///     "total_tickets": 42,
///     "active_tickets": 17,
///     "completed_tickets": 25,
///     "monthly_revenue": 1830.5,
///     "by_status": [ { "status": "accepted", "label": "Accepted", "count": 4 } ]
///   },
///   "message": "Statistics retrieved"
/// }
/// ```
async fn get_dashboard_stats(State(app_state): State<AppState>) -> Response {
    match statistics::dashboard(app_state.db()).await {
        Ok(stats) => (
            StatusCode::OK,
            Json(ApiResponse::success(stats, "Statistics retrieved")),
        )
            .into_response(),
        Err(e) => db_error("Failed to compute dashboard statistics", e).into_response(),
    }
}
