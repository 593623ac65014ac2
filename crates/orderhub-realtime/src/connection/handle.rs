//! Individual connection handle.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

use orderhub_core::types::{ConnectionId, UserId};

use crate::error::DeliveryError;

/// A frame queued for the socket writer task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Serialized event text.
    Text(String),
    /// Transport-level keep-alive ping.
    Ping,
    /// Ask the writer to close the socket.
    Close,
}

/// A handle to a single client connection.
///
/// Holds the sender for queueing frames to the socket writer, plus the
/// handshake outcome. The handshake result is written exactly once, so a
/// connection can never be re-bound to a different user.
///
/// The writer must also watch [`Self::closed`]: once the handle is dead the
/// `Close` frame may not fit in the buffer.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID
    pub id: ConnectionId,
    /// Sender for outbound frames
    sender: mpsc::Sender<Frame>,
    /// `Some(user)` after a valid handshake, `None` after any other first message
    binding: OnceLock<Option<UserId>>,
    /// When the connection was established
    pub connected_at: DateTime<Utc>,
    /// Cleared on close or send failure
    alive: AtomicBool,
    /// Cancelled together with `alive`
    shutdown: CancellationToken,
}

impl ConnectionHandle {
    /// Create a new connection handle and the receiver its writer drains
    pub fn new(buffer: usize) -> (Self, mpsc::Receiver<Frame>) {
        let (sender, receiver) = mpsc::channel(buffer.max(1));
        let handle = Self {
            id: ConnectionId::new(),
            sender,
            binding: OnceLock::new(),
            connected_at: Utc::now(),
            alive: AtomicBool::new(true),
            shutdown: CancellationToken::new(),
        };
        (handle, receiver)
    }

    /// Record the handshake outcome. Returns `false` if it was already recorded.
    pub fn complete_handshake(&self, user_id: Option<UserId>) -> bool {
        self.binding.set(user_id).is_ok()
    }

    /// Whether the first message has been processed
    pub fn is_handshake_complete(&self) -> bool {
        self.binding.get().is_some()
    }

    /// The user this connection is bound to, if any
    pub fn user_id(&self) -> Option<UserId> {
        self.binding.get().copied().flatten()
    }

    /// Queue serialized event text for this connection
    pub fn send_text(&self, text: String) -> Result<(), DeliveryError> {
        self.push(Frame::Text(text))
    }

    /// Queue a keep-alive ping
    pub fn ping(&self) -> Result<(), DeliveryError> {
        self.push(Frame::Ping)
    }

    /// Mark the connection closed and ask the writer to shut the socket.
    ///
    /// Returns an error if the close frame could not be queued; the handle
    /// is marked dead and [`Self::closed`] resolves either way.
    pub fn close(&self) -> Result<(), DeliveryError> {
        let was_alive = self.alive.swap(false, Ordering::SeqCst);
        self.shutdown.cancel();
        if !was_alive {
            return Ok(());
        }
        self.sender
            .try_send(Frame::Close)
            .map_err(|_| DeliveryError::ConnectionLost { conn_id: self.id })
    }

    /// Whether the connection can still accept frames
    pub fn is_open(&self) -> bool {
        self.alive.load(Ordering::SeqCst) && !self.sender.is_closed()
    }

    /// Mark connection as dead
    pub fn mark_dead(&self) {
        self.alive.store(false, Ordering::SeqCst);
        self.shutdown.cancel();
    }

    /// Resolves once the connection has been closed or marked dead.
    pub fn closed(&self) -> WaitForCancellationFuture<'_> {
        self.shutdown.cancelled()
    }

    /// Whether [`Self::closed`] has already resolved
    pub fn is_closed(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    fn push(&self, frame: Frame) -> Result<(), DeliveryError> {
        if !self.is_open() {
            return Err(DeliveryError::ConnectionLost { conn_id: self.id });
        }
        match self.sender.try_send(frame) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(conn_id = %self.id, "Send buffer full, treating connection as lost");
                self.mark_dead();
                Err(DeliveryError::ConnectionLost { conn_id: self.id })
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_dead();
                Err(DeliveryError::ConnectionLost { conn_id: self.id })
            }
        }
    }
}
