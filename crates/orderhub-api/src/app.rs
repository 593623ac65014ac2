//! Application builder: wires state, router and the server lifecycle.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tracing::{info, warn};

use orderhub_campaign::{CampaignStore, MemoryCampaignStore, seed_store};
use orderhub_core::config::AppConfig;
use orderhub_core::error::{AppError, ErrorKind};
use orderhub_core::result::AppResult;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Builds the shared state over an in-memory store seeded from `config`.
pub async fn build_state(config: AppConfig) -> AppResult<AppState> {
    let store: Arc<dyn CampaignStore> = Arc::new(MemoryCampaignStore::new());
    let seeded = seed_store(store.as_ref(), &config.campaign.seeds).await?;
    info!(campaigns = seeded, "Campaign store ready");

    Ok(AppState::new(config, store))
}

/// Runs the OrderHub server until Ctrl+C, then drains connections.
pub async fn run_server(config: AppConfig) -> AppResult<()> {
    info!("Starting OrderHub server...");

    // ── Step 1: Campaign store, engine, ledger, notifier ─────────
    let state = build_state(config).await?;
    let heartbeat = state.realtime.spawn_heartbeat();

    // ── Step 2: HTTP server ──────────────────────────────────────
    let addr = state.config.server.bind_addr();
    let grace = Duration::from_secs(state.config.server.shutdown_grace_seconds);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, format!("Failed to bind {addr}"), e))?;

    info!(addr = %addr, "OrderHub server listening");

    let realtime = state.realtime.clone();
    let app = build_app(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            realtime.shutdown();
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    if tokio::time::timeout(grace, heartbeat).await.is_err() {
        warn!(grace_secs = grace.as_secs(), "Heartbeat did not stop within grace period");
    }

    info!("OrderHub server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C; shutting down");
    }
    info!("Shutdown signal received");
}
