//! Response DTOs.

use serde::{Deserialize, Serialize};

use orderhub_campaign::LedgerMetricsSnapshot;
use orderhub_realtime::{DispatchOutcome, MetricsSnapshot};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Always `"ok"` while the process serves requests.
    pub status: String,
    /// Users with a live real-time session.
    pub connected_users: usize,
}

/// Process-local counters for both subsystems.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResponse {
    /// Connection and delivery counters.
    pub realtime: MetricsSnapshot,
    /// Redemption outcome counters.
    pub redemptions: LedgerMetricsSnapshot,
}

/// Acknowledgement for an order hook.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAccepted {
    /// Always `true`; delivery is best-effort.
    pub accepted: bool,
    /// Whether the owner had a live connection that took the event.
    pub delivered: bool,
}

impl From<DispatchOutcome> for EventAccepted {
    fn from(outcome: DispatchOutcome) -> Self {
        Self {
            accepted: true,
            delivered: outcome.is_delivered(),
        }
    }
}
