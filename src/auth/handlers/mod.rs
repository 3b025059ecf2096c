//! HTTP handlers for authentication endpoints
//!
//! ```text
//! handlers/
//! ├── mod.rs      - Handler exports
//! ├── types.rs    - Request/response types
//! ├── register.rs - POST /auth/register
//! ├── login.rs    - POST /auth/login
//! └── me.rs       - GET /auth/me
//! ```

/// Request/response types
pub mod types;

/// User registration handler
pub mod register;

/// User authentication handler
pub mod login;

/// Get current user handler
pub mod me;

pub use login::login;
pub use me::me;
pub use register::register;
