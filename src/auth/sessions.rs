/**
 * Session Management and JWT Tokens
 *
 * This module handles JWT token generation and validation for user sessions.
 * Tokens carry the numeric user id as the `sub` claim, matching what the
 * realtime identity verifier expects.
 */

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Default token lifetime in minutes when ACCESS_TOKEN_EXPIRE_MINUTES is unset
const DEFAULT_EXPIRE_MINUTES: u64 = 30;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: user id as a decimal string
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

/// Get JWT secret from environment
fn get_jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|err| {
        tracing::warn!("Missing JWT_SECRET ({}), using development default", err);
        "your-secret-key-change-in-production".to_string()
    })
}

/// Get configured token lifetime in minutes
fn get_expire_minutes() -> u64 {
    std::env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_EXPIRE_MINUTES)
}

/// Create a JWT token for a user
///
/// # Arguments
/// * `user_id` - Numeric user id, stored as the `sub` claim
///
/// # Returns
/// JWT token string
pub fn create_token(user_id: i64) -> Result<String, jsonwebtoken::errors::Error> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let exp = now + get_expire_minutes() * 60;

    let claims = Claims {
        sub: user_id.to_string(),
        exp,
        iat: now,
    };

    let secret = get_jwt_secret();
    let key = EncodingKey::from_secret(secret.as_ref());

    encode(&Header::default(), &claims, &key)
}

/// Verify and decode a JWT token
///
/// # Arguments
/// * `token` - JWT token string
///
/// # Returns
/// Decoded claims or error
pub fn verify_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let secret = get_jwt_secret();
    let key = DecodingKey::from_secret(secret.as_ref());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &key, &validation)?;
    Ok(token_data.claims)
}

/// Extract the numeric user id from a token
///
/// All failure modes (malformed token, expired, non-numeric subject) are
/// collapsed into a single error string; callers treat any failure as an
/// authentication failure.
pub fn user_id_from_token(token: &str) -> Result<i64, String> {
    let claims = verify_token(token).map_err(|e| format!("Token verification failed: {}", e))?;
    claims
        .sub
        .parse::<i64>()
        .map_err(|e| format!("Invalid user id in token: {}", e))
}
