//! # orderhub-api
//!
//! HTTP API layer for OrderHub built on Axum.
//!
//! Provides the campaign redemption endpoints, the order-event hooks,
//! the WebSocket upgrade, middleware (CORS, request logging), extractors,
//! DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, build_state, run_server};
pub use error::ApiError;
pub use state::AppState;
