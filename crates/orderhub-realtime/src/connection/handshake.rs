//! Single-message handshake binding a connection to a user.

use tracing::debug;

use orderhub_core::types::UserId;

use crate::message::serializer::deserialize_inbound;
use crate::message::types::InboundMessage;
use crate::message::validator::validate_inbound;

/// Result of interpreting a connection's first message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeOutcome {
    /// A valid `AUTH` message naming this user.
    Bound(UserId),
    /// Anything else. The connection stays unauthenticated.
    Anonymous(AnonymousReason),
}

/// Why a first message did not bind the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnonymousReason {
    /// Empty, oversized, or not JSON of a known shape.
    Malformed,
    /// Well-formed, but not an `AUTH` message.
    NotAuth,
    /// `AUTH` whose `userId` is not a UUID.
    InvalidUserId,
}

impl HandshakeOutcome {
    /// The bound user, if any.
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Self::Bound(user) => Some(*user),
            Self::Anonymous(_) => None,
        }
    }
}

/// Interpret the first text message received on a connection.
pub fn resolve(raw: &str) -> HandshakeOutcome {
    if let Err(e) = validate_inbound(raw) {
        debug!(error = %e, "Rejected handshake message");
        return HandshakeOutcome::Anonymous(AnonymousReason::Malformed);
    }

    match deserialize_inbound(raw) {
        Ok(InboundMessage::Auth { user_id }) => match user_id.trim().parse::<UserId>() {
            Ok(user) => HandshakeOutcome::Bound(user),
            Err(_) => HandshakeOutcome::Anonymous(AnonymousReason::InvalidUserId),
        },
        Ok(_) => HandshakeOutcome::Anonymous(AnonymousReason::NotAuth),
        Err(e) => {
            debug!(error = %e, "Unparseable handshake message");
            HandshakeOutcome::Anonymous(AnonymousReason::Malformed)
        }
    }
}
