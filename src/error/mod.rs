//! API Error Types
//!
//! This module defines the error types used by the HTTP handlers and their
//! conversion into HTTP responses.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports
//! ├── types.rs      - ApiError definition
//! └── conversion.rs - IntoResponse implementation
//! ```

/// Error type definitions
pub mod types;

/// Conversion of errors into HTTP responses
pub mod conversion;

pub use types::ApiError;
