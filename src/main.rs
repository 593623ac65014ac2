//! OrderHub Server: real-time order notifications and campaign redemption.
//!
//! Main entry point that loads configuration, sets up logging and starts the server.

use anyhow::Context;
use tracing_subscriber::{EnvFilter, fmt};

use orderhub_core::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = std::env::var("ORDERHUB_ENV").unwrap_or_else(|_| "development".to_string());

    let config = AppConfig::load(&env).context("Failed to load configuration")?;

    init_logging(&config);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        env = %env,
        "Starting OrderHub"
    );

    orderhub_api::run_server(config)
        .await
        .context("Server error")?;

    Ok(())
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}
