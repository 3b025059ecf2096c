/**
 * Server Initialization
 *
 * Builds the fully-configured Axum application: database, shared state,
 * and the route table.
 */

use axum::Router;

use crate::routes::router::create_router;
use crate::server::config::{self, ConfigError};
use crate::server::state::AppState;

/// Create the Axum app
///
/// Connects to the database, runs migrations, builds the realtime state and
/// assembles the router.
pub async fn create_app() -> Result<Router, ConfigError> {
    let pool = config::load_database().await?;
    let app_state = AppState::new(pool);
    Ok(create_router(app_state))
}
