//! Error types for assessment-server
//!
//! Every handler error renders as `{ "success": false, "error": ..., "code": ... }`
//! so browser and webhook callers never see internal exception details beyond
//! the message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("{0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Internal server error (500)
    #[error("{0}")]
    Internal(String),

    /// assessment-common error
    #[error(transparent)]
    Common(#[from] assessment_common::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use assessment_common::Error as CommonError;

        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
            ApiError::Common(CommonError::NotFound(msg)) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", msg)
            }
            ApiError::Common(CommonError::InvalidInput(msg)) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg)
            }
            ApiError::Common(ref err) => {
                tracing::error!(error = %err, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    err.to_string(),
                )
            }
        };

        let body = Json(json!({
            "success": false,
            "error": message,
            "code": error_code,
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
