/**
 * Authentication Handler Types
 *
 * Request and response types for the auth endpoints. Field names are part of
 * the public API surface and are kept stable for client compatibility.
 */

use serde::{Deserialize, Serialize};

use crate::auth::users::User;

/// Registration request (POST /auth/register)
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Registration response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub id: i64,
}

/// Login request (POST /auth/login)
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response carrying the bearer token
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// Public user info (GET /auth/me)
#[derive(Debug, Serialize)]
pub struct UserOut {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_active: bool,
}

impl From<User> for UserOut {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            is_active: user.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_is_bearer() {
        let response = TokenResponse::bearer("abc".to_string());
        assert_eq!(response.token_type, "bearer");
        assert_eq!(response.access_token, "abc");
    }

    #[test]
    fn test_user_out_hides_password() {
        let user = User {
            id: 1,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            hashed_password: "secret-hash".to_string(),
            is_active: true,
            created_at: chrono::Utc::now(),
        };
        let out = UserOut::from(user);
        let json = serde_json::to_string(&out).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(json.contains("alice"));
    }
}
