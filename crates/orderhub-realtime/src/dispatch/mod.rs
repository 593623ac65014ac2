//! Targeted delivery of domain events to a single user's session.

pub mod dispatcher;
pub mod notifier;

pub use dispatcher::{DispatchOutcome, EventDispatcher};
pub use notifier::OrderNotifier;
