/**
 * Application State Management
 *
 * This module defines the application state structure and implements the
 * `FromRef` traits for Axum state extraction.
 *
 * # Thread Safety
 *
 * All state is shared and thread-safe:
 * - `PgPool` is internally pooled and cloneable
 * - The session registry and room broker are `Arc`-shared; their internal
 *   indices are sharded concurrent maps
 */

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::realtime::authz::PgMembershipOracle;
use crate::realtime::broker::RoomBroker;
use crate::realtime::registry::SessionRegistry;

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub db_pool: PgPool,

    /// Connection → session index
    pub registry: Arc<SessionRegistry>,

    /// Room → subscribers index and fan-out
    ///
    /// The HTTP write paths publish through this after a successful insert.
    pub broker: Arc<RoomBroker>,
}

impl AppState {
    /// Build the state: the registry and a broker wired to the
    /// Postgres-backed membership oracle.
    pub fn new(db_pool: PgPool) -> Self {
        let registry = Arc::new(SessionRegistry::new());
        let oracle = Arc::new(PgMembershipOracle::new(db_pool.clone()));
        let broker = Arc::new(RoomBroker::new(registry.clone(), oracle));

        Self {
            db_pool,
            registry,
            broker,
        }
    }
}

/// Allow handlers to extract the pool directly
impl FromRef<AppState> for PgPool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}
