//! Route definitions for the OrderHub HTTP API.
//!
//! REST routes are mounted under `/api`; the WebSocket lives at `/ws`.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(campaign_routes())
        .merge(order_routes())
        .merge(health_routes());

    let ws_routes = Router::new().route("/ws", get(handlers::ws::ws_handler));

    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .merge(ws_routes)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Campaign redemption endpoints
fn campaign_routes() -> Router<AppState> {
    Router::new()
        .route("/campaigns/redeem", post(handlers::campaign::redeem))
        .route("/campaigns/preview", post(handlers::campaign::preview))
}

/// Order event hooks
fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/orders/events/created", post(handlers::order::order_created))
        .route(
            "/orders/events/status-changed",
            post(handlers::order::order_status_changed),
        )
}

/// Health check and counters
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/metrics", get(handlers::health::metrics))
}
