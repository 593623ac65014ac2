//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use orderhub_campaign::{CampaignStore, RedemptionLedger};
use orderhub_core::config::AppConfig;
use orderhub_realtime::{OrderNotifier, RealtimeEngine};

/// Shared application state, cloned into every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Real-time delivery engine.
    pub realtime: Arc<RealtimeEngine>,
    /// Campaign redemption ledger.
    pub ledger: Arc<RedemptionLedger>,
    /// Order event notifier handed to the order hooks.
    pub notifier: OrderNotifier,
}

impl AppState {
    /// Wire the engine and ledger over `store`.
    pub fn new(config: AppConfig, store: Arc<dyn CampaignStore>) -> Self {
        let realtime = Arc::new(RealtimeEngine::new(config.realtime.clone()));
        let ledger = Arc::new(RedemptionLedger::new(store, config.campaign.discount_policy));
        let notifier = realtime.notifier();

        Self {
            config: Arc::new(config),
            realtime,
            ledger,
            notifier,
        }
    }
}
