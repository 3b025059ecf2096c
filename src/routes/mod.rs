//! Route Configuration
//!
//! ```text
//! routes/
//! ├── mod.rs        - Module exports
//! ├── router.rs     - Router assembly
//! ├── api_routes.rs - Auth, messaging and group routes
//! └── health.rs     - Health check handlers
//! ```

/// Router assembly
pub mod router;

/// API route configuration
pub mod api_routes;

/// Health check handlers
pub mod health;

pub use router::create_router;
