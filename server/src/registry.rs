//! Live-session tracking and broadcast fan-out.
//!
//! This module handles the server-side bookkeeping of connected sessions:
//! - Session registration and removal over the connection lifecycle
//! - Broadcast delivery to every live session without blocking on any one peer
//! - Eviction of sessions whose outbound channel has died
//!
//! Each session is represented by its peer address (for logging) and the
//! sending half of the unbounded channel its writer task drains. Broadcasting
//! is therefore a non-blocking push per session: a slow or dead peer can
//! delay only its own writer task, never the broadcaster or the other
//! recipients.

use log::{info, warn};
use std::collections::HashMap;
use std::net::SocketAddr;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

/// Registry-side handle to one connected session.
///
/// The session task owns the socket; the registry only holds the outbound
/// channel, so removing a handle never tears the connection down by itself.
#[derive(Debug)]
struct SessionHandle {
    addr: SocketAddr,
    sender: mpsc::UnboundedSender<Message>,
}

/// The set of live sessions, keyed by a server-assigned session id.
///
/// Membership changes are the only mutation. Callers serialize access
/// through an `Arc<RwLock<ConnectionRegistry>>`, which makes broadcast
/// iteration safe against concurrent registration and removal.
#[derive(Debug)]
pub struct ConnectionRegistry {
    sessions: HashMap<u64, SessionHandle>,
    next_session_id: u64,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
            next_session_id: 1,
        }
    }

    /// Adds a session and returns the id used to unregister it later.
    pub fn register(&mut self, addr: SocketAddr, sender: mpsc::UnboundedSender<Message>) -> u64 {
        let session_id = self.next_session_id;
        self.next_session_id += 1;

        self.sessions.insert(session_id, SessionHandle { addr, sender });
        info!(
            "Session {} registered from {} ({} connected)",
            session_id,
            addr,
            self.sessions.len()
        );

        session_id
    }

    /// Removes a session. Idempotent: removing an unknown or already-removed
    /// id is a safe no-op. Returns whether the session was present.
    pub fn unregister(&mut self, session_id: u64) -> bool {
        self.sessions.remove(&session_id).is_some()
    }

    /// Sends `payload` to every registered session.
    ///
    /// A session whose channel is gone is logged and dropped from the
    /// registry; the remaining recipients are unaffected. Returns the number
    /// of sessions the payload was handed to.
    pub fn broadcast(&mut self, payload: &str) -> usize {
        let mut dead = Vec::new();
        let mut delivered = 0;

        for (session_id, session) in &self.sessions {
            if session.sender.send(Message::Text(payload.to_owned())).is_ok() {
                delivered += 1;
            } else {
                warn!(
                    "Dropping session {} ({}): send channel closed",
                    session_id, session.addr
                );
                dead.push(*session_id);
            }
        }

        for session_id in dead {
            self.unregister(session_id);
        }

        delivered
    }

    /// Returns the number of currently registered sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns true if no sessions are registered.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_addr() -> SocketAddr {
        "127.0.0.1:8080".parse().unwrap()
    }

    fn test_addr2() -> SocketAddr {
        "127.0.0.1:8081".parse().unwrap()
    }

    fn text_of(message: Message) -> String {
        match message {
            Message::Text(text) => text,
            other => panic!("Expected a text message, got {:?}", other),
        }
    }

    #[test]
    fn test_register_assigns_distinct_ids() {
        let mut registry = ConnectionRegistry::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();

        let first = registry.register(test_addr(), tx);
        let second = registry.register(test_addr2(), tx2);

        assert_ne!(first, second);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_unregister_is_idempotent() {
        let mut registry = ConnectionRegistry::new();
        let (tx, _rx) = mpsc::unbounded_channel();

        let session_id = registry.register(test_addr(), tx);
        assert!(registry.unregister(session_id));
        assert!(!registry.unregister(session_id));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unregister_unknown_session_is_noop() {
        let mut registry = ConnectionRegistry::new();
        assert!(!registry.unregister(999));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_broadcast_reaches_every_session() {
        let mut registry = ConnectionRegistry::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();

        registry.register(test_addr(), tx);
        registry.register(test_addr2(), tx2);

        let delivered = registry.broadcast("payload");

        assert_eq!(delivered, 2);
        assert_eq!(text_of(rx.try_recv().unwrap()), "payload");
        assert_eq!(text_of(rx2.try_recv().unwrap()), "payload");
    }

    #[test]
    fn test_broadcast_survives_one_dead_session() {
        let mut registry = ConnectionRegistry::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (dead_tx, dead_rx) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();

        registry.register(test_addr(), tx);
        let dead_id = registry.register(test_addr2(), dead_tx);
        registry.register(test_addr(), tx2);
        drop(dead_rx);

        let delivered = registry.broadcast("tick");

        assert_eq!(delivered, 2);
        assert_eq!(text_of(rx.try_recv().unwrap()), "tick");
        assert_eq!(text_of(rx2.try_recv().unwrap()), "tick");

        // The dead session is evicted immediately, not just scheduled.
        assert_eq!(registry.len(), 2);
        assert!(!registry.unregister(dead_id));
    }

    #[test]
    fn test_broadcast_to_empty_registry() {
        let mut registry = ConnectionRegistry::new();
        assert_eq!(registry.broadcast("tick"), 0);
    }
}
