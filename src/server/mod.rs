//! Server Module
//!
//! Initialization and configuration of the Axum HTTP server.
//!
//! ```text
//! server/
//! ├── mod.rs    - Module exports
//! ├── state.rs  - AppState and FromRef implementations
//! ├── config.rs - Configuration loading (database, port)
//! └── init.rs   - Server initialization and app creation
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Configuration Loading**: reads environment, connects to Postgres,
//!    runs migrations
//! 2. **State Creation**: builds the session registry and room broker
//! 3. **Router Creation**: configures all routes

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

// Re-export commonly used types
pub use init::create_app;
pub use state::AppState;
