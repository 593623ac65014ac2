//! Order snapshots and the mutations that produce real-time events.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::id::{OrderId, UserId};

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Placed, not yet confirmed by the shop.
    Pending,
    /// Accepted by the shop.
    Confirmed,
    /// Being prepared.
    Preparing,
    /// Ready for pickup or dispatch.
    Ready,
    /// Out for delivery.
    Shipped,
    /// Handed over to the customer.
    Delivered,
    /// Cancelled by the customer or the shop.
    Cancelled,
}

impl OrderStatus {
    /// Return the wire name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time view of an order as handed over by the CRUD layer.
///
/// Only the fields the core routes on are typed; everything else the
/// order document carries (items, address, notes) rides along untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSnapshot {
    /// Order ID.
    pub id: OrderId,
    /// Owner of the order; the only user that receives its events.
    pub user_id: UserId,
    /// Current status.
    pub status: OrderStatus,
    /// Order total.
    pub total_amount: Decimal,
    /// Remaining order fields.
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

/// An order mutation that should be pushed to the order's owner.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderEvent {
    /// A new order was created.
    Created {
        /// The created order.
        order: OrderSnapshot,
    },
    /// An order moved from one status to another.
    StatusChanged {
        /// The order after the change.
        order: OrderSnapshot,
        /// Status before the change.
        old_status: OrderStatus,
    },
}

impl OrderEvent {
    /// The user this event must be delivered to.
    pub fn target_user(&self) -> UserId {
        match self {
            Self::Created { order } | Self::StatusChanged { order, .. } => order.user_id,
        }
    }
}
