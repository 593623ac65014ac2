//! Builder helpers for constructing outbound events.

use chrono::Utc;

use orderhub_core::events::{OrderEvent, OrderSnapshot, OrderStatus};

use super::types::{DomainEvent, OrderStatusChange};

/// Build the greeting sent on connect
pub fn build_connected() -> DomainEvent {
    DomainEvent::Connected {
        message: "Connected to order notifications".to_string(),
        timestamp: Utc::now(),
    }
}

/// Build a new order event
pub fn build_new_order(order: &OrderSnapshot) -> DomainEvent {
    DomainEvent::NewOrder {
        message: format!("Order {} has been received", order.id),
        order: order.clone(),
        timestamp: Utc::now(),
    }
}

/// Build an order status change event
pub fn build_order_update(order: &OrderSnapshot, old_status: OrderStatus) -> DomainEvent {
    DomainEvent::OrderUpdate {
        message: format!(
            "Order {} status changed from {} to {}",
            order.id, old_status, order.status
        ),
        order: OrderStatusChange {
            old_status,
            order: order.clone(),
        },
        timestamp: Utc::now(),
    }
}

/// Build the client event for an order mutation
pub fn build_from_order_event(event: &OrderEvent) -> DomainEvent {
    match event {
        OrderEvent::Created { order } => build_new_order(order),
        OrderEvent::StatusChanged { order, old_status } => build_order_update(order, *old_status),
    }
}
