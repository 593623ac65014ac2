//! Order domain events emitted by the order-mutation layer.
//!
//! The real-time engine consumes these and turns them into targeted
//! client messages for the order's owner.

pub mod order;

pub use order::{OrderEvent, OrderSnapshot, OrderStatus};
