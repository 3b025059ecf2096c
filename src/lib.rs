//! WireChat - Main Library
//!
//! A realtime chat backend: persisted direct and group messaging fronted by
//! an authenticated publish/subscribe layer over WebSockets.
//!
//! # Overview
//!
//! The crate provides:
//! - Axum HTTP server with JSON CRUD endpoints for auth, private messages
//!   and groups
//! - A realtime room broker: per-connection sessions, room subscriptions
//!   with relational authorization, and message fan-out
//! - PostgreSQL persistence via sqlx
//! - JWT-based authentication
//!
//! # Module Structure
//!
//! ```text
//! src/
//! ├── server/      - Server initialization, state, configuration
//! ├── routes/      - HTTP route configuration
//! ├── auth/        - Users, JWT tokens, auth endpoints
//! ├── middleware/  - Request authentication extractor
//! ├── messaging/   - Private message CRUD
//! ├── groups/      - Group and group message CRUD
//! ├── realtime/    - Connection/session/room broker and fan-out
//! └── error/       - API error types
//! ```

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Authentication and user management
pub mod auth;

/// Request authentication middleware
pub mod middleware;

/// Private messaging endpoints and persistence
pub mod messaging;

/// Group endpoints and persistence
pub mod groups;

/// Realtime session registry, room broker and fan-out
pub mod realtime;

/// API error types
pub mod error;

// Re-export commonly used types
pub use error::ApiError;
pub use realtime::broker::RoomBroker;
pub use realtime::registry::SessionRegistry;
pub use server::create_app;
