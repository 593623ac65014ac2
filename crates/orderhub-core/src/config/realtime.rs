//! Real-time order-event delivery configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Real-time (WebSocket) delivery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Heartbeat sweep period in seconds.
    #[serde(default = "default_ping_interval")]
    pub ping_interval_seconds: u64,
    /// Evict sessions with no pong for this many seconds. `0` disables
    /// the check; only non-open connections are evicted then.
    #[serde(default)]
    pub stale_after_seconds: u64,
    /// Outbound frame buffer per connection.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            ping_interval_seconds: default_ping_interval(),
            stale_after_seconds: 0,
            channel_buffer_size: default_channel_buffer(),
        }
    }
}

impl RealtimeConfig {
    /// Heartbeat sweep period.
    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.ping_interval_seconds.max(1))
    }

    /// Staleness threshold, if enabled.
    pub fn stale_after(&self) -> Option<Duration> {
        (self.stale_after_seconds > 0).then(|| Duration::from_secs(self.stale_after_seconds))
    }
}

fn default_ping_interval() -> u64 {
    60
}

fn default_channel_buffer() -> usize {
    64
}
