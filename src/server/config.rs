/**
 * Server Configuration
 *
 * This module handles loading of server configuration from environment
 * variables and establishing the PostgreSQL connection.
 *
 * # Environment
 *
 * - `DATABASE_URL` - required; the server cannot run without its database
 * - `JWT_SECRET` - token signing secret (see `auth::sessions`)
 * - `ACCESS_TOKEN_EXPIRE_MINUTES` - token lifetime, default 30
 * - `SERVER_PORT` - listen port, default 3000
 * - `RUST_LOG` - tracing filter
 */

use sqlx::PgPool;
use thiserror::Error;

/// Configuration/startup errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("DATABASE_URL is not set")]
    MissingDatabaseUrl,

    #[error("Failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("Failed to run migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Connect to Postgres and run migrations
///
/// Unlike optional services, the database is load-bearing for every
/// endpoint and for room authorization, so failure here is fatal.
pub async fn load_database() -> Result<PgPool, ConfigError> {
    let database_url = std::env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url)
        .await
        .map_err(ConfigError::Connect)?;
    tracing::info!("Database connection pool created");

    tracing::info!("Running database migrations...");
    sqlx::migrate!().run(&pool).await?;
    tracing::info!("Database migrations completed");

    Ok(pool)
}

/// Listen port from SERVER_PORT, default 3000
pub fn server_port() -> u16 {
    std::env::var("SERVER_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000)
}
