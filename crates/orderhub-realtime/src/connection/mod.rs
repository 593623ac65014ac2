//! Connection management: handles, handshake, session registry, heartbeat.

pub mod handle;
pub mod handshake;
pub mod heartbeat;
pub mod registry;

pub use handle::{ConnectionHandle, Frame};
pub use registry::{Session, SessionRegistry};
