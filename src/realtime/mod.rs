//! Realtime Module
//!
//! The connection/session/room broker: a long-lived per-connection session
//! abstraction that authenticates a WebSocket, binds it to a user identity,
//! and grants or denies membership in named broadcast rooms based on
//! relational authorization. Messages written through the HTTP path are
//! fanned out to exactly the sockets currently subscribed to the relevant
//! room.
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs        - Module exports
//! ├── room.rs       - Room name grammar and canonical constructors
//! ├── events.rs     - Wire frames (client and server events)
//! ├── authz.rs      - Membership oracle (group authorization)
//! ├── registry.rs   - Session registry (connection → session index)
//! ├── broker.rs     - Room broker (room → subscribers index, fan-out)
//! └── connection.rs - WebSocket upgrade handler and socket task
//! ```
//!
//! # Concurrency
//!
//! Each connection's protocol events are linearized by its own socket task;
//! operations on different connections run concurrently. The two shared
//! indices (room → subscribers, connection → session) are sharded DashMaps,
//! so a publish on one room never contends with a subscribe on another. The
//! membership lookup inside subscribe awaits on the database with no index
//! lock held.

/// Room name grammar and canonical constructors
pub mod room;

/// Wire protocol frames
pub mod events;

/// Membership oracle for room authorization
pub mod authz;

/// Session registry: connection lifecycle and identity binding
pub mod registry;

/// Room broker: subscribe/unsubscribe/publish
pub mod broker;

/// WebSocket transport: upgrade handler and per-connection task
pub mod connection;

// Re-export commonly used types
pub use authz::MembershipOracle;
pub use broker::{RoomBroker, SubscribeOutcome};
pub use events::{ClientEvent, ServerEvent};
pub use registry::{ConnectionId, SessionRegistry};
pub use room::{dm_room, group_room, user_room};
