//! Inbound and outbound message type definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orderhub_core::events::{OrderSnapshot, OrderStatus};

/// Messages sent by the client to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InboundMessage {
    /// Handshake binding the connection to a user.
    Auth {
        /// User identity as sent by the client.
        #[serde(rename = "userId")]
        user_id: String,
    },
    /// Application-level keep-alive reply.
    Pong,
}

/// Events pushed by the server to a single user's connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainEvent {
    /// Greeting sent on every new connection, before the handshake.
    Connected {
        /// Greeting text.
        message: String,
        /// Server time.
        timestamp: DateTime<Utc>,
    },
    /// An order owned by the user was created.
    NewOrder {
        /// The created order.
        order: OrderSnapshot,
        /// Display text.
        message: String,
        /// Server time.
        timestamp: DateTime<Utc>,
    },
    /// An order owned by the user changed status.
    OrderUpdate {
        /// The order plus its previous status.
        order: OrderStatusChange,
        /// Display text.
        message: String,
        /// Server time.
        timestamp: DateTime<Utc>,
    },
}

impl DomainEvent {
    /// Wire tag of this event.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Connected { .. } => "CONNECTED",
            Self::NewOrder { .. } => "NEW_ORDER",
            Self::OrderUpdate { .. } => "ORDER_UPDATE",
        }
    }
}

/// Order snapshot annotated with the status it moved away from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusChange {
    /// Status before the change.
    pub old_status: OrderStatus,
    /// The order after the change.
    #[serde(flatten)]
    pub order: OrderSnapshot,
}
