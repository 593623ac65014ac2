//! Periodic keep-alive sweep over the session registry.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use orderhub_core::config::RealtimeConfig;

use super::registry::SessionRegistry;

/// Heartbeat configuration
#[derive(Debug, Clone)]
pub struct HeartbeatConfig {
    /// Interval between sweeps
    pub ping_interval: Duration,
    /// Evict sessions silent for longer than this, if set
    pub stale_after: Option<Duration>,
}

impl From<&RealtimeConfig> for HeartbeatConfig {
    fn from(config: &RealtimeConfig) -> Self {
        Self {
            ping_interval: config.ping_interval(),
            stale_after: config.stale_after(),
        }
    }
}

/// Outcome of one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Sessions that were pinged successfully
    pub pinged: usize,
    /// Sessions removed during the sweep
    pub evicted: usize,
}

/// Ping every registered session once, evicting the ones that cannot be reached.
///
/// Works on a snapshot so no registry shard is locked while pinging.
pub fn sweep(
    registry: &SessionRegistry,
    stale_after: Option<Duration>,
    now: DateTime<Utc>,
) -> SweepReport {
    let mut report = SweepReport::default();

    for session in registry.snapshot() {
        let conn_id = session.handle.id;

        if !session.handle.is_open() {
            if registry.evict_connection(&session.user_id, conn_id) {
                report.evicted += 1;
            }
            continue;
        }

        if let Some(limit) = stale_after {
            let silent = (now - session.last_seen_at).to_std().unwrap_or_default();
            if silent > limit {
                debug!(user_id = %session.user_id, conn_id = %conn_id, silent_secs = silent.as_secs(), "Session stale");
                if registry.evict_connection(&session.user_id, conn_id) {
                    report.evicted += 1;
                }
                continue;
            }
        }

        match session.handle.ping() {
            Ok(()) => report.pinged += 1,
            Err(e) => {
                debug!(user_id = %session.user_id, error = %e, "Ping failed");
                if registry.evict_connection(&session.user_id, conn_id) {
                    report.evicted += 1;
                }
            }
        }
    }

    report
}

/// Run the sweep every `ping_interval` until shutdown is signalled.
pub async fn run_heartbeat(
    registry: Arc<SessionRegistry>,
    config: HeartbeatConfig,
    mut shutdown: broadcast::Receiver<()>,
) {
    let period = config.ping_interval.max(Duration::from_millis(1));
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(interval_secs = period.as_secs(), "Heartbeat started");

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let report = sweep(&registry, config.stale_after, Utc::now());
                if report.evicted > 0 {
                    info!(pinged = report.pinged, evicted = report.evicted, "Heartbeat sweep");
                } else {
                    debug!(pinged = report.pinged, "Heartbeat sweep");
                }
            }
            _ = shutdown.recv() => break,
        }
    }

    info!("Heartbeat stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::handle::{ConnectionHandle, Frame};
    use crate::metrics::RealtimeMetrics;
    use orderhub_core::types::UserId;

    fn registry() -> Arc<SessionRegistry> {
        Arc::new(SessionRegistry::new(Arc::new(RealtimeMetrics::new())))
    }

    fn admit(reg: &SessionRegistry) -> (UserId, Arc<ConnectionHandle>, tokio::sync::mpsc::Receiver<Frame>) {
        let user = UserId::new();
        let (handle, rx) = ConnectionHandle::new(8);
        handle.complete_handshake(Some(user));
        let handle = Arc::new(handle);
        reg.admit(user, handle.clone());
        (user, handle, rx)
    }

    #[tokio::test]
    async fn test_sweep_pings_live_and_evicts_closed() {
        let reg = registry();
        let (live_user, _live, mut live_rx) = admit(&reg);
        let (dead_user, _dead, dead_rx) = admit(&reg);
        drop(dead_rx);

        let report = sweep(&reg, None, Utc::now());

        assert_eq!(report, SweepReport { pinged: 1, evicted: 1 });
        assert!(reg.is_connected(&live_user));
        assert!(!reg.is_connected(&dead_user));
        assert_eq!(live_rx.recv().await, Some(Frame::Ping));
    }

    #[tokio::test]
    async fn test_sweep_evicts_stale_sessions_when_enabled() {
        let reg = registry();
        let (user, _handle, _rx) = admit(&reg);
        let later = Utc::now() + chrono::Duration::seconds(120);

        let kept = sweep(&reg, None, later);
        assert_eq!(kept.evicted, 0);

        let report = sweep(&reg, Some(Duration::from_secs(60)), later);
        assert_eq!(report.evicted, 1);
        assert!(!reg.is_connected(&user));
    }

    #[tokio::test(start_paused = true)]
    async fn test_heartbeat_stops_on_shutdown() {
        let reg = registry();
        let (_user, _handle, mut rx) = admit(&reg);
        let (tx, shutdown_rx) = broadcast::channel(1);
        let config = HeartbeatConfig {
            ping_interval: Duration::from_secs(60),
            stale_after: None,
        };

        let task = tokio::spawn(run_heartbeat(reg.clone(), config, shutdown_rx));

        time::sleep(Duration::from_secs(61)).await;
        assert_eq!(rx.recv().await, Some(Frame::Ping));

        tx.send(()).unwrap();
        task.await.unwrap();
    }
}
