//! Custom Axum extractors.

pub mod caller;
pub mod json;

pub use caller::CallerId;
pub use json::ValidatedJson;
