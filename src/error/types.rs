/**
 * API Error Types
 *
 * This module defines the error type returned by HTTP handlers. Each variant
 * maps to an HTTP status code and a JSON body of the form
 * `{"detail": "<message>"}`.
 *
 * # Error Categories
 *
 * - Client errors: bad request, unauthorized, forbidden, not found
 * - Internal errors: database, password hashing, token generation
 *
 * Internal errors are logged server-side and collapsed to a generic message
 * in the response body so no internals leak to clients.
 */

use axum::http::StatusCode;
use thiserror::Error;

/// Errors returned by HTTP handlers
///
/// # Usage
///
/// ```rust
/// use wirechat::error::ApiError;
///
/// let err = ApiError::bad_request("Username already exists");
/// ```
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request content (e.g. duplicate username, self-message)
    #[error("{message}")]
    BadRequest {
        /// Human-readable error message
        message: String,
    },

    /// Missing or invalid credentials
    #[error("{message}")]
    Unauthorized {
        /// Human-readable error message
        message: String,
    },

    /// Authenticated but not allowed (e.g. not a group member)
    #[error("{message}")]
    Forbidden {
        /// Human-readable error message
        message: String,
    },

    /// Referenced entity does not exist
    #[error("{message}")]
    NotFound {
        /// Human-readable error message
        message: String,
    },

    /// Database query failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Password hashing failure
    #[error("Password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    /// JWT creation or validation failure
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// JSON serialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApiError {
    /// Create a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create a 401 Unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Create a 403 Forbidden error
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Create a 404 Not Found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Hash(_) | Self::Token(_) | Self::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the message exposed to clients in the `detail` field
    ///
    /// Internal errors are collapsed to a generic message; the underlying
    /// cause is only logged.
    pub fn detail(&self) -> String {
        match self {
            Self::BadRequest { message }
            | Self::Unauthorized { message }
            | Self::Forbidden { message }
            | Self::NotFound { message } => message.clone(),
            Self::Database(_) | Self::Hash(_) | Self::Token(_) | Self::Serialization(_) => {
                "Internal server error".to_string()
            }
        }
    }
}
