//! Common error types for the assessment service

use thiserror::Error;

/// Common result type for assessment operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the library and the server
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encode/decode error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Outbound HTTP call failed or was rejected by the remote side
    #[error("HTTP error: {0}")]
    Http(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}
