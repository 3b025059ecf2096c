/**
 * Health Check Handlers
 *
 * Liveness (`/health`) and database reachability (`/health/db`).
 */

use axum::extract::State;
use axum::response::Json;
use serde_json::{json, Value};
use sqlx::PgPool;

/// Liveness check (GET /health)
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Database reachability check (GET /health/db)
///
/// Always answers 200; the body reports the probe outcome.
pub async fn db_health(State(pool): State<PgPool>) -> Json<Value> {
    match sqlx::query("SELECT 1").execute(&pool).await {
        Ok(_) => Json(json!({ "database": "ok" })),
        Err(e) => {
            tracing::warn!("Database health check failed: {}", e);
            Json(json!({ "database": "error", "details": e.to_string() }))
        }
    }
}
