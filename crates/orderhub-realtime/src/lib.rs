//! # orderhub-realtime
//!
//! Real-time order-event delivery for OrderHub. Provides:
//!
//! - A session registry holding exactly one live connection per user
//! - Single-message handshake binding a connection to a user
//! - Periodic heartbeat sweep that prunes dead connections
//! - Targeted, best-effort dispatch of order events (no broadcast)
//! - [`OrderNotifier`], the handle order-mutation code is given

pub mod connection;
pub mod dispatch;
pub mod error;
pub mod message;
pub mod metrics;
pub mod server;

pub use connection::handle::{ConnectionHandle, Frame};
pub use connection::registry::{Session, SessionRegistry};
pub use dispatch::dispatcher::{DispatchOutcome, EventDispatcher};
pub use dispatch::notifier::OrderNotifier;
pub use error::DeliveryError;
pub use message::types::{DomainEvent, InboundMessage};
pub use metrics::MetricsSnapshot;
pub use server::RealtimeEngine;
