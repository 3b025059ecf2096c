/**
 * Authentication Extractor
 *
 * This module provides an Axum extractor for protected routes. It extracts
 * and verifies the JWT token from the Authorization header and yields the
 * authenticated user id.
 */

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::auth::sessions::user_id_from_token;
use crate::error::ApiError;

/// Axum extractor for the authenticated user id
///
/// Usage in a handler:
///
/// ```rust,ignore
/// async fn handler(AuthUser(user_id): AuthUser) { /* ... */ }
/// ```
///
/// Returns 401 Unauthorized if the header is missing, not a bearer token,
/// or the token fails verification.
#[derive(Clone, Debug)]
pub struct AuthUser(pub i64);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| {
                tracing::warn!("Missing Authorization header");
                ApiError::unauthorized("Not authenticated")
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            tracing::warn!("Invalid Authorization header format");
            ApiError::unauthorized("Not authenticated")
        })?;

        let user_id = user_id_from_token(token).map_err(|e| {
            tracing::warn!("Token rejected: {}", e);
            ApiError::unauthorized("Could not validate credentials")
        })?;

        Ok(AuthUser(user_id))
    }
}
