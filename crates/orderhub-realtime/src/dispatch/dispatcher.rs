//! Event dispatcher: routes one event to one user's live connection.

use std::sync::Arc;

use tracing::{debug, warn};

use orderhub_core::types::UserId;

use crate::connection::registry::SessionRegistry;
use crate::error::DeliveryError;
use crate::message::serializer::serialize_event;
use crate::message::types::DomainEvent;
use crate::metrics::RealtimeMetrics;

/// What happened to a dispatched event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Queued on the user's live connection.
    Delivered,
    /// The user has no session; the event was dropped.
    NotConnected,
    /// The send failed and the session was evicted.
    ConnectionLost,
    /// The event could not be encoded; nothing was sent.
    Unserializable,
}

impl DispatchOutcome {
    /// Whether the event was queued on a live connection.
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}

/// Delivers events to online users. Best-effort: no retry, no backlog, no broadcast.
#[derive(Debug)]
pub struct EventDispatcher {
    /// Session registry
    registry: Arc<SessionRegistry>,
    /// Metrics
    metrics: Arc<RealtimeMetrics>,
}

impl EventDispatcher {
    /// Create a new dispatcher
    pub fn new(registry: Arc<SessionRegistry>, metrics: Arc<RealtimeMetrics>) -> Self {
        Self { registry, metrics }
    }

    /// Send `event` to `user_id`'s current connection.
    ///
    /// Never fails towards the caller; failures are logged and reported
    /// through the returned outcome.
    pub fn dispatch(&self, user_id: UserId, event: &DomainEvent) -> DispatchOutcome {
        let Some(handle) = self.registry.lookup(&user_id) else {
            let err = DeliveryError::Unauthenticated { user_id };
            debug!(user_id = %user_id, event = event.kind(), reason = %err, "Event dropped");
            self.metrics.record_dropped();
            return DispatchOutcome::NotConnected;
        };

        let text = match serialize_event(event) {
            Ok(text) => text,
            Err(e) => {
                warn!(user_id = %user_id, event = event.kind(), error = %e, "Failed to serialize event");
                self.metrics.record_dropped();
                return DispatchOutcome::Unserializable;
            }
        };

        match handle.send_text(text) {
            Ok(()) => {
                self.metrics.record_delivered();
                debug!(user_id = %user_id, conn_id = %handle.id, event = event.kind(), "Event delivered");
                DispatchOutcome::Delivered
            }
            Err(e) => {
                warn!(user_id = %user_id, conn_id = %handle.id, event = event.kind(), error = %e, "Delivery failed, evicting session");
                self.registry.evict_connection(&user_id, handle.id);
                self.metrics.record_dropped();
                DispatchOutcome::ConnectionLost
            }
        }
    }
}
