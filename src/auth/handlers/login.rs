/**
 * Login Handler
 *
 * This module implements the user authentication handler for
 * POST /auth/login.
 *
 * # Authentication Process
 *
 * 1. Look up user by username
 * 2. Verify password using bcrypt
 * 3. Generate JWT token
 *
 * # Security
 *
 * - Unknown username and wrong password return the same 400 error, so the
 *   response does not reveal which part was wrong
 * - Passwords are never logged or returned in responses
 */

use axum::{extract::State, response::Json};
use sqlx::PgPool;

use crate::auth::handlers::types::{LoginRequest, TokenResponse};
use crate::auth::sessions::create_token;
use crate::auth::users::get_user_by_username;
use crate::error::ApiError;

/// Login handler
pub async fn login(
    State(pool): State<PgPool>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    tracing::info!("Login request for: {}", request.username);

    let user = get_user_by_username(&pool, &request.username).await?;

    let user = match user {
        Some(user) => user,
        None => {
            tracing::warn!("Login failed, unknown username: {}", request.username);
            return Err(ApiError::bad_request("Invalid username or password"));
        }
    };

    let valid = bcrypt::verify(&request.password, &user.hashed_password)?;
    if !valid {
        tracing::warn!("Login failed, bad password for: {}", request.username);
        return Err(ApiError::bad_request("Invalid username or password"));
    }

    let token = create_token(user.id)?;

    tracing::info!("User logged in: {} (id {})", user.username, user.id);

    Ok(Json(TokenResponse::bearer(token)))
}
