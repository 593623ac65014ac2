//! Session registry: the single source of truth for `user → live connection`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::{debug, info, warn};

use orderhub_core::types::{ConnectionId, UserId};

use super::handle::ConnectionHandle;
use crate::metrics::RealtimeMetrics;

/// The live binding between a user and one open connection.
#[derive(Debug, Clone)]
pub struct Session {
    /// Bound user.
    pub user_id: UserId,
    /// The user's current connection.
    pub handle: Arc<ConnectionHandle>,
    /// Last admission or keep-alive reply.
    pub last_seen_at: DateTime<Utc>,
}

/// Thread-safe registry holding at most one session per user.
#[derive(Debug)]
pub struct SessionRegistry {
    /// User ID → session.
    sessions: DashMap<UserId, Session>,
    /// Metrics.
    metrics: Arc<RealtimeMetrics>,
}

impl SessionRegistry {
    /// Creates a new empty registry.
    pub fn new(metrics: Arc<RealtimeMetrics>) -> Self {
        Self {
            sessions: DashMap::new(),
            metrics,
        }
    }

    /// Registers `handle` as the user's session, superseding any other.
    ///
    /// The previous connection is closed after the entry has been replaced.
    /// A failure to close it is logged; the new session stays registered.
    pub fn admit(&self, user_id: UserId, handle: Arc<ConnectionHandle>) {
        let conn_id = handle.id;
        let previous = self.sessions.insert(
            user_id,
            Session {
                user_id,
                handle,
                last_seen_at: Utc::now(),
            },
        );

        match previous {
            Some(old) if old.handle.id != conn_id => {
                if let Err(e) = old.handle.close() {
                    warn!(
                        user_id = %user_id,
                        conn_id = %old.handle.id,
                        error = %e,
                        "Failed to close superseded connection"
                    );
                }
                self.metrics.record_eviction();
                info!(
                    user_id = %user_id,
                    old_conn_id = %old.handle.id,
                    conn_id = %conn_id,
                    "Session superseded by new connection"
                );
            }
            Some(_) => {
                debug!(user_id = %user_id, conn_id = %conn_id, "Session re-admitted");
            }
            None => {
                info!(user_id = %user_id, conn_id = %conn_id, "Session admitted");
            }
        }
    }

    /// Returns the user's current connection, if any.
    pub fn lookup(&self, user_id: &UserId) -> Option<Arc<ConnectionHandle>> {
        self.sessions.get(user_id).map(|s| s.handle.clone())
    }

    /// Returns a copy of the user's session, if any.
    pub fn session(&self, user_id: &UserId) -> Option<Session> {
        self.sessions.get(user_id).map(|s| s.value().clone())
    }

    /// Refreshes `last_seen_at` for the user's session.
    pub fn touch(&self, user_id: &UserId) -> bool {
        match self.sessions.get_mut(user_id) {
            Some(mut session) => {
                session.last_seen_at = Utc::now();
                true
            }
            None => false,
        }
    }

    /// Refreshes `last_seen_at` only if the session still uses `conn_id`.
    pub fn touch_connection(&self, user_id: &UserId, conn_id: ConnectionId) -> bool {
        match self.sessions.get_mut(user_id) {
            Some(mut session) if session.handle.id == conn_id => {
                session.last_seen_at = Utc::now();
                true
            }
            _ => false,
        }
    }

    /// Removes the user's session whatever connection it holds.
    pub fn evict(&self, user_id: &UserId) -> Option<Session> {
        let (_, session) = self.sessions.remove(user_id)?;
        self.close_evicted(&session);
        Some(session)
    }

    /// Removes the user's session only while it still points at `conn_id`.
    ///
    /// Used for disconnects and send failures, so a superseded connection
    /// can never evict its successor.
    pub fn evict_connection(&self, user_id: &UserId, conn_id: ConnectionId) -> bool {
        match self
            .sessions
            .remove_if(user_id, |_, session| session.handle.id == conn_id)
        {
            Some((_, session)) => {
                self.close_evicted(&session);
                true
            }
            None => false,
        }
    }

    /// Clones every session so callers can iterate without holding shard locks.
    pub fn snapshot(&self) -> Vec<Session> {
        self.sessions.iter().map(|s| s.value().clone()).collect()
    }

    /// Whether the user currently has a session.
    pub fn is_connected(&self, user_id: &UserId) -> bool {
        self.sessions.contains_key(user_id)
    }

    /// Number of registered sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no session is registered.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Closes and removes every session.
    pub fn close_all(&self) -> usize {
        let users: Vec<UserId> = self.sessions.iter().map(|s| *s.key()).collect();
        let closed = users.iter().filter_map(|u| self.evict(u)).count();
        info!(count = closed, "All sessions closed");
        closed
    }

    fn close_evicted(&self, session: &Session) {
        if let Err(e) = session.handle.close() {
            debug!(
                user_id = %session.user_id,
                conn_id = %session.handle.id,
                error = %e,
                "Evicted connection was already gone"
            );
        }
        self.metrics.record_eviction();
        info!(
            user_id = %session.user_id,
            conn_id = %session.handle.id,
            "Session evicted"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::handle::Frame;

    fn registry() -> SessionRegistry {
        SessionRegistry::new(Arc::new(RealtimeMetrics::new()))
    }

    fn bound(user: UserId) -> (Arc<ConnectionHandle>, tokio::sync::mpsc::Receiver<Frame>) {
        let (handle, rx) = ConnectionHandle::new(8);
        handle.complete_handshake(Some(user));
        (Arc::new(handle), rx)
    }

    #[tokio::test]
    async fn test_second_admit_supersedes_first() {
        let reg = registry();
        let user = UserId::new();
        let (first, mut first_rx) = bound(user);
        let (second, _second_rx) = bound(user);

        reg.admit(user, first.clone());
        reg.admit(user, second.clone());

        assert_eq!(reg.len(), 1);
        assert_eq!(reg.lookup(&user).map(|h| h.id), Some(second.id));
        assert!(!first.is_open());
        assert_eq!(first_rx.recv().await, Some(Frame::Close));
    }

    #[tokio::test]
    async fn test_readmit_same_connection_keeps_it_open() {
        let reg = registry();
        let user = UserId::new();
        let (handle, _rx) = bound(user);

        reg.admit(user, handle.clone());
        reg.admit(user, handle.clone());

        assert!(handle.is_open());
        assert_eq!(reg.len(), 1);
    }

    #[tokio::test]
    async fn test_lookup_is_idempotent() {
        let reg = registry();
        let user = UserId::new();
        let (handle, _rx) = bound(user);
        reg.admit(user, handle);

        let a = reg.lookup(&user).map(|h| h.id);
        let b = reg.lookup(&user).map(|h| h.id);
        assert_eq!(a, b);
        assert!(a.is_some());
    }

    #[tokio::test]
    async fn test_stale_teardown_does_not_evict_successor() {
        let reg = registry();
        let user = UserId::new();
        let (old, _old_rx) = bound(user);
        let (new, _new_rx) = bound(user);

        reg.admit(user, old.clone());
        reg.admit(user, new.clone());

        assert!(!reg.evict_connection(&user, old.id));
        assert_eq!(reg.lookup(&user).map(|h| h.id), Some(new.id));
        assert!(reg.evict_connection(&user, new.id));
        assert!(reg.lookup(&user).is_none());
    }

    #[tokio::test]
    async fn test_touch_connection_ignores_other_connections() {
        let reg = registry();
        let user = UserId::new();
        let (handle, _rx) = bound(user);
        reg.admit(user, handle.clone());

        assert!(!reg.touch_connection(&user, ConnectionId::new()));
        assert!(reg.touch_connection(&user, handle.id));
        assert!(!reg.touch(&UserId::new()));
    }

    #[tokio::test]
    async fn test_close_all_empties_registry() {
        let reg = registry();
        let handles: Vec<_> = (0..3)
            .map(|_| {
                let user = UserId::new();
                let (h, rx) = bound(user);
                reg.admit(user, h.clone());
                (h, rx)
            })
            .collect();

        assert_eq!(reg.close_all(), 3);
        assert!(reg.is_empty());
        assert!(handles.iter().all(|(h, _)| !h.is_open()));
    }

    #[tokio::test]
    async fn test_admit_continues_when_old_connection_cannot_be_closed() {
        let metrics = Arc::new(RealtimeMetrics::new());
        let reg = SessionRegistry::new(metrics.clone());
        let user = UserId::new();
        let (old, old_rx) = bound(user);
        let (new, mut new_rx) = bound(user);

        reg.admit(user, old.clone());
        drop(old_rx);
        assert!(!old.is_open());
        reg.admit(user, new.clone());

        assert_eq!(reg.lookup(&user).map(|h| h.id), Some(new.id));
        assert!(old.is_closed());
        assert!(new.is_open());
        assert_eq!(metrics.snapshot().evictions, 1);

        assert!(new.send_text("still here".into()).is_ok());
        assert_eq!(new_rx.recv().await, Some(Frame::Text("still here".into())));
    }
}
