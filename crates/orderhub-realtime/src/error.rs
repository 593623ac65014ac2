//! Delivery failures.

use thiserror::Error;

use orderhub_core::types::{ConnectionId, UserId};

/// Why an event could not be pushed.
///
/// These never reach the order-mutation path; the dispatcher logs them
/// and evicts the affected session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// The target user has no registered session.
    #[error("user {user_id} has no live session")]
    Unauthenticated {
        /// Target user.
        user_id: UserId,
    },
    /// The connection closed or stalled mid-send.
    #[error("connection {conn_id} lost")]
    ConnectionLost {
        /// The failed connection.
        conn_id: ConnectionId,
    },
}
