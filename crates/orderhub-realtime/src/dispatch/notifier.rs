//! Order-facing handle for pushing order events to their owners.

use std::sync::Arc;

use orderhub_core::events::{OrderEvent, OrderSnapshot, OrderStatus};

use super::dispatcher::{DispatchOutcome, EventDispatcher};
use crate::message::builder::build_from_order_event;

/// Handed to order-mutation code so it can announce changes.
///
/// Calls never fail and never block on the network.
#[derive(Debug, Clone)]
pub struct OrderNotifier {
    dispatcher: Arc<EventDispatcher>,
}

impl OrderNotifier {
    /// Wrap a dispatcher for order-mutation code.
    pub fn new(dispatcher: Arc<EventDispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Deliver the client event for `event` to the order's owner.
    pub fn publish(&self, event: &OrderEvent) -> DispatchOutcome {
        self.dispatcher
            .dispatch(event.target_user(), &build_from_order_event(event))
    }

    /// Announce a newly created order.
    pub fn order_created(&self, order: OrderSnapshot) -> DispatchOutcome {
        self.publish(&OrderEvent::Created { order })
    }

    /// Announce a status transition.
    pub fn order_status_changed(&self, order: OrderSnapshot, old_status: OrderStatus) -> DispatchOutcome {
        self.publish(&OrderEvent::StatusChanged { order, old_status })
    }
}
