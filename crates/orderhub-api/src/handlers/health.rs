//! Health check and metrics handlers.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{HealthResponse, MetricsResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        connected_users: state.realtime.connected_users(),
    })
}

/// GET /api/metrics
pub async fn metrics(State(state): State<AppState>) -> Json<MetricsResponse> {
    Json(MetricsResponse {
        realtime: state.realtime.metrics.snapshot(),
        redemptions: state.ledger.metrics(),
    })
}
