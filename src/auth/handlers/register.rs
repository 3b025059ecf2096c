/**
 * Registration Handler
 *
 * This module implements the user registration handler for
 * POST /auth/register.
 *
 * # Registration Process
 *
 * 1. Check the username is not already taken
 * 2. Hash the password with bcrypt
 * 3. Insert the user row
 *
 * # Errors
 *
 * * `400 Bad Request` - Username already exists
 * * `500 Internal Server Error` - Database or hashing failure
 */

use axum::{extract::State, response::Json};
use sqlx::PgPool;

use crate::auth::handlers::types::{RegisterRequest, RegisterResponse};
use crate::auth::users::{create_user, get_user_by_username};
use crate::error::ApiError;

/// Registration handler
pub async fn register(
    State(pool): State<PgPool>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    tracing::info!("Registration request for: {}", request.username);

    if get_user_by_username(&pool, &request.username)
        .await?
        .is_some()
    {
        return Err(ApiError::bad_request("Username already exists"));
    }

    let hashed = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)?;

    let user = create_user(&pool, &request.username, &request.email, &hashed).await?;

    tracing::info!("User registered: {} (id {})", user.username, user.id);

    Ok(Json(RegisterResponse {
        message: "User registered successfully".to_string(),
        id: user.id,
    }))
}
