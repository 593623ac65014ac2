//! Top-level real-time engine that ties together all subsystems.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use orderhub_core::config::RealtimeConfig;

use crate::connection::handle::{ConnectionHandle, Frame};
use crate::connection::handshake::{self, HandshakeOutcome};
use crate::connection::heartbeat::{self, HeartbeatConfig};
use crate::connection::registry::SessionRegistry;
use crate::dispatch::{EventDispatcher, OrderNotifier};
use crate::message::builder::build_connected;
use crate::message::serializer::{deserialize_inbound, serialize_event};
use crate::message::types::InboundMessage;
use crate::message::validator::validate_inbound;
use crate::metrics::RealtimeMetrics;

/// Central real-time engine that coordinates the WebSocket subsystems.
#[derive(Clone)]
pub struct RealtimeEngine {
    /// Session registry.
    pub registry: Arc<SessionRegistry>,
    /// Event dispatcher.
    pub dispatcher: Arc<EventDispatcher>,
    /// Metrics collector.
    pub metrics: Arc<RealtimeMetrics>,
    /// Configuration.
    config: RealtimeConfig,
    /// Shutdown signal sender.
    shutdown_tx: broadcast::Sender<()>,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine")
            .field("sessions", &self.registry.len())
            .finish()
    }
}

impl RealtimeEngine {
    /// Creates a new real-time engine with all subsystems.
    pub fn new(config: RealtimeConfig) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        let metrics = Arc::new(RealtimeMetrics::new());
        let registry = Arc::new(SessionRegistry::new(metrics.clone()));
        let dispatcher = Arc::new(EventDispatcher::new(registry.clone(), metrics.clone()));

        info!(
            ping_interval_secs = config.ping_interval_seconds,
            stale_after_secs = config.stale_after_seconds,
            "Real-time engine initialized"
        );

        Self {
            registry,
            dispatcher,
            metrics,
            config,
            shutdown_tx,
        }
    }

    /// Notifier to hand to order-mutation code.
    pub fn notifier(&self) -> OrderNotifier {
        OrderNotifier::new(self.dispatcher.clone())
    }

    /// Number of users with a live session.
    pub fn connected_users(&self) -> usize {
        self.registry.len()
    }

    /// Accept a new connection and queue its greeting.
    ///
    /// The caller drains the returned receiver into the socket.
    pub fn open_connection(&self) -> (Arc<ConnectionHandle>, mpsc::Receiver<Frame>) {
        let (handle, rx) = ConnectionHandle::new(self.config.channel_buffer_size);
        let handle = Arc::new(handle);
        self.metrics.record_connection_opened();

        match serialize_event(&build_connected()) {
            Ok(text) => {
                if let Err(e) = handle.send_text(text) {
                    warn!(conn_id = %handle.id, error = %e, "Failed to queue greeting");
                }
            }
            Err(e) => warn!(conn_id = %handle.id, error = %e, "Failed to serialize greeting"),
        }

        debug!(conn_id = %handle.id, "Connection opened");
        (handle, rx)
    }

    /// Process one inbound text message.
    ///
    /// The first message is the handshake. Later messages may only be
    /// keep-alive replies; a second `AUTH` never rebinds the connection.
    pub fn handle_text(&self, handle: &Arc<ConnectionHandle>, text: &str) {
        self.metrics.record_message_received();

        if !handle.is_handshake_complete() {
            let outcome = handshake::resolve(text);
            if !handle.complete_handshake(outcome.user_id()) {
                return;
            }
            match outcome {
                HandshakeOutcome::Bound(user_id) => {
                    self.registry.admit(user_id, handle.clone());
                }
                HandshakeOutcome::Anonymous(reason) => {
                    debug!(conn_id = %handle.id, ?reason, "Connection left unauthenticated");
                }
            }
            return;
        }

        if validate_inbound(text).is_err() {
            return;
        }
        match deserialize_inbound(text) {
            Ok(InboundMessage::Pong) => self.handle_pong(handle),
            Ok(InboundMessage::Auth { .. }) => {
                debug!(conn_id = %handle.id, "Ignoring repeated handshake");
            }
            Err(e) => debug!(conn_id = %handle.id, error = %e, "Ignoring unparseable message"),
        }
    }

    /// Record a keep-alive reply.
    pub fn handle_pong(&self, handle: &ConnectionHandle) {
        if let Some(user_id) = handle.user_id() {
            self.registry.touch_connection(&user_id, handle.id);
        }
    }

    /// Tear down a connection after its socket closed.
    pub fn close_connection(&self, handle: &ConnectionHandle) {
        handle.mark_dead();
        if let Some(user_id) = handle.user_id() {
            self.registry.evict_connection(&user_id, handle.id);
        }
        self.metrics.record_connection_closed();
        let open_secs = (chrono::Utc::now() - handle.connected_at).num_seconds();
        debug!(conn_id = %handle.id, open_secs, "Connection closed");
    }

    /// Start the heartbeat sweep. It stops when [`Self::shutdown`] is called.
    pub fn spawn_heartbeat(&self) -> JoinHandle<()> {
        tokio::spawn(heartbeat::run_heartbeat(
            self.registry.clone(),
            HeartbeatConfig::from(&self.config),
            self.shutdown_tx.subscribe(),
        ))
    }

    /// Stops background tasks and closes every session.
    pub fn shutdown(&self) {
        info!("Shutting down real-time engine");

        if self.shutdown_tx.send(()).is_err() {
            debug!("No shutdown subscribers");
        }
        self.registry.close_all();

        info!("Real-time engine shut down");
    }
}
