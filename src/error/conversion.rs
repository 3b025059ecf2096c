/**
 * Error Response Conversion
 *
 * This module implements `IntoResponse` for `ApiError`, producing JSON
 * bodies of the form `{"detail": "<message>"}` with the appropriate HTTP
 * status code.
 */

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

use crate::error::types::ApiError;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Internal error handling request: {}", self);
        } else {
            tracing::debug!("Request failed: {} {}", status, self);
        }

        (status, Json(json!({ "detail": self.detail() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_response_status() {
        let response = ApiError::bad_request("Cannot message yourself").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_error_response_status() {
        let response = ApiError::Database(sqlx::Error::RowNotFound).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
