/**
 * Current User Handler
 *
 * This module implements GET /auth/me: it resolves the authenticated user's
 * row and returns the public fields.
 */

use axum::{extract::State, response::Json};
use sqlx::PgPool;

use crate::auth::handlers::types::UserOut;
use crate::auth::users::get_user_by_id;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;

/// Get current user handler
///
/// # Errors
///
/// * `401 Unauthorized` - Missing/invalid token, or the token's subject no
///   longer exists
pub async fn me(
    State(pool): State<PgPool>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<UserOut>, ApiError> {
    let user = get_user_by_id(&pool, user_id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("User not found"))?;

    Ok(Json(UserOut::from(user)))
}
