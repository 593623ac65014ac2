//! JSON serialization for wire messages.

use serde_json;

use super::types::{DomainEvent, InboundMessage};

/// Serialize an outbound event
pub fn serialize_event(event: &DomainEvent) -> Result<String, serde_json::Error> {
    serde_json::to_string(event)
}

/// Deserialize an inbound message from JSON
pub fn deserialize_inbound(text: &str) -> Result<InboundMessage, serde_json::Error> {
    serde_json::from_str(text)
}
