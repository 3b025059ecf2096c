/**
 * Room Broker
 *
 * Maps each room name to its current subscriber set and owns
 * subscribe/unsubscribe/publish. Rooms are created implicitly on first
 * subscribe and exist only as the set of subscribers referencing them; a
 * room with zero subscribers is immediately forgotten.
 *
 * # Authorization
 *
 * Every subscribe re-checks authorization against the membership oracle.
 * Nothing is cached: group membership changes between subscribes, and a
 * lookup is far cheaper than staleness. Lookup failures fail closed.
 *
 * # Fan-out contract
 *
 * `publish` snapshots the subscriber set at the moment of the call and then
 * delivers without holding any lock. Subscribers that join after the
 * snapshot do not receive the message; subscribers that leave during
 * delivery may or may not. Delivery to one subscriber can never block or
 * fail delivery to another: each connection has its own bounded outbound
 * queue, and a full or closed queue drops that subscriber from the room
 * instead of failing the publish.
 */

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::realtime::authz::MembershipOracle;
use crate::realtime::events::ServerEvent;
use crate::realtime::registry::{ConnectionId, RegistryError, SessionRegistry};
use crate::realtime::room::{self, RoomKind};

/// Result of a subscribe call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeOutcome {
    /// Connection added to the room's subscriber set
    Subscribed,
    /// No session bound to the connection
    Unauthenticated,
    /// Room name does not match the grammar; no room state was touched
    Malformed,
    /// Well-formed room, but the authorization predicate answered no
    /// (indistinguishable from the room/group not existing)
    Denied,
    /// The connection disconnected while the subscribe was in flight; the
    /// operation was fully discarded
    Disconnected,
}

/// Room → subscriber index plus the operations on it
///
/// Shared (`Arc`) between the WebSocket tasks and the HTTP write path.
pub struct RoomBroker {
    /// Subscriber sets keyed by the raw room string. Each entry holds the
    /// outbound queues of the currently-subscribed connections.
    rooms: DashMap<String, HashMap<ConnectionId, mpsc::Sender<ServerEvent>>>,
    registry: Arc<SessionRegistry>,
    oracle: Arc<dyn MembershipOracle>,
}

impl RoomBroker {
    pub fn new(registry: Arc<SessionRegistry>, oracle: Arc<dyn MembershipOracle>) -> Self {
        Self {
            rooms: DashMap::new(),
            registry,
            oracle,
        }
    }

    /// Admit an authenticated connection
    ///
    /// Binds the session in the registry and auto-joins the per-identity
    /// private room `user:<id>`.
    pub fn connect(
        &self,
        conn_id: ConnectionId,
        user_id: i64,
        tx: mpsc::Sender<ServerEvent>,
    ) -> Result<(), RegistryError> {
        self.registry.register(conn_id, user_id, tx)?;

        let private = room::user_room(user_id);
        if let Some(tx) = self.registry.add_room(conn_id, &private) {
            self.rooms
                .entry(private)
                .or_default()
                .insert(conn_id, tx);
        }

        tracing::debug!("[Realtime] Connection {} bound to user {}", conn_id, user_id);
        Ok(())
    }

    /// Tear down a connection
    ///
    /// Idempotent. Removes the session and releases every subscription it
    /// held, so a subsequent publish to those rooms no longer reaches it.
    pub fn disconnect(&self, conn_id: ConnectionId) {
        if let Some((user_id, rooms)) = self.registry.remove(conn_id) {
            for room in &rooms {
                self.remove_subscriber(room, conn_id);
            }
            tracing::debug!(
                "[Realtime] Connection {} (user {}) disconnected, left {} rooms",
                conn_id,
                user_id,
                rooms.len()
            );
        }
    }

    /// Subscribe a connection to a room
    ///
    /// Parses the room name, consults the membership oracle (awaiting with
    /// no index lock held), and on success updates both indices and acks
    /// `subscribed`. On denial only an `error` event is emitted; room state
    /// is untouched and the connection stays open.
    pub async fn subscribe(&self, conn_id: ConnectionId, room: &str) -> SubscribeOutcome {
        let user_id = match self.registry.user_id(conn_id) {
            Some(id) => id,
            None => {
                tracing::debug!("[Realtime] Subscribe from unauthenticated connection {}", conn_id);
                return SubscribeOutcome::Unauthenticated;
            }
        };

        let kind = match room::parse_room(room) {
            Some(kind) => kind,
            None => {
                self.emit(conn_id, ServerEvent::not_authorized());
                return SubscribeOutcome::Malformed;
            }
        };

        if !self.authorize(user_id, kind).await {
            tracing::debug!(
                "[Realtime] User {} denied subscription to {:?}",
                user_id,
                room
            );
            self.emit(conn_id, ServerEvent::not_authorized());
            return SubscribeOutcome::Denied;
        }

        // Record the room on the session first: a missing session here means
        // the connection disconnected while the oracle query was in flight,
        // and the whole operation must become a no-op.
        let tx = match self.registry.add_room(conn_id, room) {
            Some(tx) => tx,
            None => return SubscribeOutcome::Disconnected,
        };

        self.rooms
            .entry(room.to_string())
            .or_default()
            .insert(conn_id, tx);

        // A disconnect may have raced between the two index updates; if the
        // session is gone, roll back so the room never holds a connection
        // absent from the registry.
        if !self.registry.contains(conn_id) {
            self.remove_subscriber(room, conn_id);
            return SubscribeOutcome::Disconnected;
        }

        tracing::debug!("[Realtime] User {} subscribed to {}", user_id, room);
        self.emit(
            conn_id,
            ServerEvent::Subscribed {
                room: room.to_string(),
            },
        );
        SubscribeOutcome::Subscribed
    }

    /// Unsubscribe a connection from a room
    ///
    /// Unconditional and idempotent: leaving a room never joined is a no-op
    /// that still acks `unsubscribed`. No authorization check is required to
    /// leave.
    pub fn unsubscribe(&self, conn_id: ConnectionId, room: &str) {
        self.remove_subscriber(room, conn_id);
        self.registry.remove_room(conn_id, room);
        self.emit(
            conn_id,
            ServerEvent::Unsubscribed {
                room: room.to_string(),
            },
        );
    }

    /// Publish a payload to the current subscribers of a room
    ///
    /// Best-effort fan-out against a snapshot of the subscriber set. A
    /// subscriber whose outbound queue is closed or full is dropped from the
    /// room as a side effect (self-healing) rather than failing the publish.
    /// Publishing to a room with no subscribers is a safe no-op.
    ///
    /// Returns the number of subscribers the payload was queued for.
    pub fn publish(&self, room: &str, data: Value) -> usize {
        let targets: Vec<(ConnectionId, mpsc::Sender<ServerEvent>)> =
            match self.rooms.get(room) {
                Some(subs) => subs.iter().map(|(id, tx)| (*id, tx.clone())).collect(),
                None => return 0,
            };

        let mut delivered = 0;
        for (conn_id, tx) in targets {
            let event = ServerEvent::Message {
                room: room.to_string(),
                data: data.clone(),
            };
            match tx.try_send(event) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::warn!(
                        "[Realtime] Dropping subscriber {} of {}: outbound queue {}",
                        conn_id,
                        room,
                        match e {
                            mpsc::error::TrySendError::Full(_) => "full",
                            mpsc::error::TrySendError::Closed(_) => "closed",
                        }
                    );
                    self.remove_subscriber(room, conn_id);
                    self.registry.remove_room(conn_id, room);
                }
            }
        }

        tracing::debug!("[Realtime] Published to {}: {} subscribers", room, delivered);
        delivered
    }

    /// Number of current subscribers of a room (diagnostics/tests)
    pub fn subscriber_count(&self, room: &str) -> usize {
        self.rooms.get(room).map(|subs| subs.len()).unwrap_or(0)
    }

    /// Whether a room currently exists (has at least one subscriber)
    pub fn room_exists(&self, room: &str) -> bool {
        self.rooms.contains_key(room)
    }

    /// Evaluate the authorization predicate for a parsed room
    ///
    /// Oracle failures fail closed: an unreachable database denies access.
    async fn authorize(&self, user_id: i64, kind: RoomKind) -> bool {
        match kind {
            RoomKind::Group(group_id) => {
                match self.oracle.is_group_member(user_id, group_id).await {
                    Ok(member) => member,
                    Err(e) => {
                        tracing::warn!(
                            "[Realtime] Membership lookup failed for user {} group {}: {}",
                            user_id,
                            group_id,
                            e
                        );
                        false
                    }
                }
            }
            // The two ids are taken exactly as written in the room string;
            // canonical ordering is caller responsibility.
            RoomKind::Dm(a, b) => user_id == a || user_id == b,
        }
    }

    /// Remove one subscriber from a room, forgetting the room if it empties
    fn remove_subscriber(&self, room: &str, conn_id: ConnectionId) {
        let now_empty = match self.rooms.get_mut(room) {
            Some(mut subs) => {
                subs.remove(&conn_id);
                subs.is_empty()
            }
            None => false,
        };
        if now_empty {
            // Re-checked under the shard lock: a concurrent subscribe may
            // have repopulated the set between the guard drop and here.
            self.rooms.remove_if(room, |_, subs| subs.is_empty());
        }
    }

    /// Emit an event to one connection, best effort
    pub(crate) fn emit(&self, conn_id: ConnectionId, event: ServerEvent) {
        if let Some(tx) = self.registry.sender(conn_id) {
            let _ = tx.try_send(event);
        }
    }
}
