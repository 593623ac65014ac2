//! Request handlers, one module per route group.

pub mod campaign;
pub mod health;
pub mod order;
pub mod ws;
