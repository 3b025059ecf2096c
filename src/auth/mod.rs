//! Authentication Module
//!
//! This module handles user registration, login, and JWT token management.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports
//! ├── users.rs        - User model and database operations
//! ├── sessions.rs     - JWT token generation and validation
//! └── handlers/       - HTTP handlers
//!     ├── mod.rs      - Handler exports
//!     ├── types.rs    - Request/response types
//!     ├── register.rs - User registration handler
//!     ├── login.rs    - User authentication handler
//!     └── me.rs       - Get current user handler
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Register**: username/email/password → user row created
//! 2. **Login**: username/password verified → JWT token returned
//! 3. **Me**: JWT token verified → user info returned
//!
//! # Security
//!
//! - Passwords are hashed with bcrypt before storage
//! - JWT tokens are stateless, HS256-signed, with a short expiry
//! - Invalid credentials always produce the same error (no user enumeration)

/// User data model and database operations
pub mod users;

/// JWT token generation and validation
pub mod sessions;

/// HTTP handlers for authentication endpoints
pub mod handlers;

// Re-export commonly used types and handlers
pub use handlers::types::{LoginRequest, RegisterRequest, TokenResponse, UserOut};
pub use handlers::{login, me, register};
