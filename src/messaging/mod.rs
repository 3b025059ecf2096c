//! Private Messaging Module
//!
//! Persisted one-to-one messages. The write path stores a row and then
//! publishes it to the canonical dm room so currently-connected
//! participants receive it in realtime.
//!
//! ```text
//! messaging/
//! ├── mod.rs      - Module exports
//! ├── db.rs       - Message row type and queries
//! └── handlers.rs - HTTP handlers
//! ```

/// Message row type and database operations
pub mod db;

/// HTTP handlers for private messages
pub mod handlers;

pub use db::PrivateMessage;
pub use handlers::{get_private_messages, send_private_message};
