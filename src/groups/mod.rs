//! Groups Module
//!
//! Group channels: creation, membership, and persisted group messages. The
//! group-message write path publishes to `group:<id>` after a successful
//! write.
//!
//! ```text
//! groups/
//! ├── mod.rs      - Module exports
//! ├── db.rs       - Group/message row types and queries
//! └── handlers.rs - HTTP handlers
//! ```

/// Group row types and database operations
pub mod db;

/// HTTP handlers for groups
pub mod handlers;

pub use db::{Group, GroupMessage};
pub use handlers::{create_group, get_group_messages, list_groups, send_group_message};
