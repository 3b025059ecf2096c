/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines all
 * route configurations into a single Axum router.
 *
 * # Routes
 *
 * - `GET /ws` - realtime WebSocket (token in query string)
 * - `GET /health`, `GET /health/db` - health checks
 * - API routes (auth, messages, groups) - see `api_routes`
 */

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::realtime::connection::ws_handler;
use crate::routes::api_routes::configure_api_routes;
use crate::routes::health::{db_health, health};
use crate::server::state::AppState;

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health))
        .route("/health/db", get(db_health));

    let router = configure_api_routes(router);

    // Fallback handler for 404
    let router = router.fallback(|| async { "404 Not Found" });

    router
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
