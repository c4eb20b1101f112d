//! Error types for the assistant service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, Error>;

/// Service errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error (missing credentials, bad address) - fatal at startup
    #[error("Configuration error: {0}")]
    Config(String),

    /// Embedding or generation provider error
    #[error("Provider error: {0}")]
    Provider(String),

    /// Vector index error
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// Response cache error
    #[error("Cache error: {0}")]
    Cache(String),

    /// External call exceeded its bounded wait
    #[error("Timed out waiting for {0}")]
    Timeout(String),

    /// Malformed user input, rejected before any write
    #[error("Validation error: {0}")]
    Validation(String),

    /// User record store error
    #[error("Database error: {0}")]
    Database(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a provider error
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider(message.into())
    }

    /// Create a retrieval error
    pub fn retrieval(message: impl Into<String>) -> Self {
        Self::Retrieval(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Classify a reqwest failure, keeping timeouts distinct
    pub fn from_request(err: reqwest::Error, what: &str) -> Self {
        if err.is_timeout() {
            Self::Timeout(what.to_string())
        } else {
            Self::Provider(format!("{} request failed: {}", what, err))
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            Error::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error", msg.clone()),
            Error::Provider(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "provider_error", msg.clone())
            }
            Error::Retrieval(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "retrieval_error", msg.clone())
            }
            Error::Cache(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "cache_error", msg.clone()),
            Error::Timeout(what) => (
                StatusCode::GATEWAY_TIMEOUT,
                "timeout",
                format!("Timed out waiting for {}", what),
            ),
            Error::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg.clone()),
            Error::Database(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", msg.clone())
            }
            Error::Io(err) => (StatusCode::INTERNAL_SERVER_ERROR, "io_error", err.to_string()),
            Error::Json(err) => (StatusCode::BAD_REQUEST, "json_error", err.to_string()),
            Error::Http(err) => (StatusCode::BAD_GATEWAY, "http_error", err.to_string()),
            Error::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone())
            }
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
