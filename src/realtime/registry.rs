/**
 * Session Registry
 *
 * Maps each live connection to its authenticated identity and its current
 * room set. The registry owns the connection lifecycle: a session exists if
 * and only if its connection passed authentication, and a connection with no
 * session cannot subscribe to anything.
 *
 * # Concurrency
 *
 * Sessions live in a sharded `DashMap` keyed by connection id, so lookups
 * and mutations for different connections never contend. A single
 * connection's protocol events are already linearized by its socket task;
 * the per-entry lock only has to serialize those events against publishes
 * and cross-connection cleanup.
 */

use std::collections::HashSet;

use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::realtime::events::ServerEvent;

/// Opaque handle for one live transport-level link
pub type ConnectionId = Uuid;

/// Registry errors
#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    /// A session is bound for the life of a connection, never re-bound
    #[error("connection already has a bound session")]
    AlreadyBound,
}

/// Authenticated state attached to a connection
struct Session {
    /// Immutable for the session's life
    user_id: i64,
    /// Rooms currently joined; grows and shrinks via subscribe/unsubscribe
    rooms: HashSet<String>,
    /// Outbound event queue for this connection
    tx: mpsc::Sender<ServerEvent>,
}

/// Connection → session index
///
/// Created once at startup and shared (`Arc`) between the WebSocket handler
/// and the room broker.
pub struct SessionRegistry {
    sessions: DashMap<ConnectionId, Session>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Bind an authenticated identity to a connection
    ///
    /// Fails if the connection already has a session; a session is never
    /// re-bound.
    pub fn register(
        &self,
        conn_id: ConnectionId,
        user_id: i64,
        tx: mpsc::Sender<ServerEvent>,
    ) -> Result<(), RegistryError> {
        match self.sessions.entry(conn_id) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(RegistryError::AlreadyBound),
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                entry.insert(Session {
                    user_id,
                    rooms: HashSet::new(),
                    tx,
                });
                Ok(())
            }
        }
    }

    /// Tear down a session, returning the rooms it held
    ///
    /// Idempotent: removing an unknown or already-removed connection returns
    /// `None`. The caller (the broker) uses the returned room set to shrink
    /// the room subscriber index.
    pub fn remove(&self, conn_id: ConnectionId) -> Option<(i64, HashSet<String>)> {
        self.sessions
            .remove(&conn_id)
            .map(|(_, session)| (session.user_id, session.rooms))
    }

    /// The identity bound to a connection, if any
    pub fn user_id(&self, conn_id: ConnectionId) -> Option<i64> {
        self.sessions.get(&conn_id).map(|s| s.user_id)
    }

    /// The outbound queue for a connection, if it is still live
    pub fn sender(&self, conn_id: ConnectionId) -> Option<mpsc::Sender<ServerEvent>> {
        self.sessions.get(&conn_id).map(|s| s.tx.clone())
    }

    /// Record a room on the session and return its outbound queue
    ///
    /// Returns `None` when the session no longer exists, which tells the
    /// broker the connection disconnected while the subscribe was in flight.
    pub fn add_room(
        &self,
        conn_id: ConnectionId,
        room: &str,
    ) -> Option<mpsc::Sender<ServerEvent>> {
        self.sessions.get_mut(&conn_id).map(|mut session| {
            session.rooms.insert(room.to_string());
            session.tx.clone()
        })
    }

    /// Drop a room from the session's set; no-op if absent
    pub fn remove_room(&self, conn_id: ConnectionId, room: &str) {
        if let Some(mut session) = self.sessions.get_mut(&conn_id) {
            session.rooms.remove(room);
        }
    }

    /// Read-only snapshot of a session's rooms, for diagnostics and tests
    pub fn current_rooms(&self, conn_id: ConnectionId) -> Option<HashSet<String>> {
        self.sessions.get(&conn_id).map(|s| s.rooms.clone())
    }

    /// Whether the connection still has a live session
    pub fn contains(&self, conn_id: ConnectionId) -> bool {
        self.sessions.contains_key(&conn_id)
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue() -> mpsc::Sender<ServerEvent> {
        mpsc::channel(8).0
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = SessionRegistry::new();
        let conn = Uuid::new_v4();

        registry.register(conn, 42, queue()).unwrap();

        assert_eq!(registry.user_id(conn), Some(42));
        assert!(registry.contains(conn));
        assert_eq!(registry.current_rooms(conn), Some(HashSet::new()));
    }

    #[test]
    fn test_double_registration_rejected() {
        let registry = SessionRegistry::new();
        let conn = Uuid::new_v4();

        registry.register(conn, 1, queue()).unwrap();
        let result = registry.register(conn, 2, queue());

        assert_eq!(result, Err(RegistryError::AlreadyBound));
        // The first bound identity stays.
        assert_eq!(registry.user_id(conn), Some(1));
    }

    #[test]
    fn test_remove_returns_rooms_and_is_idempotent() {
        let registry = SessionRegistry::new();
        let conn = Uuid::new_v4();

        registry.register(conn, 7, queue()).unwrap();
        registry.add_room(conn, "group:1").unwrap();
        registry.add_room(conn, "dm:3:9").unwrap();

        let (user_id, rooms) = registry.remove(conn).unwrap();
        assert_eq!(user_id, 7);
        assert_eq!(rooms.len(), 2);
        assert!(rooms.contains("group:1"));

        assert!(registry.remove(conn).is_none());
        assert!(!registry.contains(conn));
    }

    #[test]
    fn test_add_room_after_remove_is_noop() {
        let registry = SessionRegistry::new();
        let conn = Uuid::new_v4();

        registry.register(conn, 7, queue()).unwrap();
        registry.remove(conn);

        assert!(registry.add_room(conn, "group:1").is_none());
    }

    #[test]
    fn test_remove_room_unknown_is_noop() {
        let registry = SessionRegistry::new();
        let conn = Uuid::new_v4();

        registry.register(conn, 7, queue()).unwrap();
        registry.remove_room(conn, "group:99");

        assert_eq!(registry.current_rooms(conn), Some(HashSet::new()));
    }
}
