//! Request processing middleware
//!
//! Currently holds the bearer-token authentication extractor used by all
//! protected routes.

/// Bearer-token authentication extractor
pub mod auth;

pub use auth::AuthUser;
