//! Error types for the CLV analytics backend

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for CLV operations
pub type Result<T> = std::result::Result<T, Error>;

/// Message shown to API clients when an upload fails as a whole
pub const INGESTION_RETRY_MESSAGE: &str =
    "AI failed to process the file. Please check the file format and try again.";

/// CLV system errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Remote call could not complete or returned a non-success status
    #[error("Transport failure: {0}")]
    Transport(String),

    /// Remote response was not JSON or did not satisfy the declared schema
    #[error("Schema violation: {0}")]
    SchemaViolation(String),

    /// One or more batches of an ingestion run failed
    #[error("Ingestion failed: {failed} of {total} batches failed ({cause})")]
    IngestionFailed {
        failed: usize,
        total: usize,
        cause: Box<Error>,
    },

    /// Customer not found
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    /// Malformed client request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An upload is already being processed
    #[error("Busy: {0}")]
    Busy(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Config file error
    #[error("Config file error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Create a schema violation error
    pub fn schema(message: impl Into<String>) -> Self {
        Self::SchemaViolation(message.into())
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// True for failures caused by the remote service rather than the caller
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Error::Transport(_) | Error::SchemaViolation(_) | Error::IngestionFailed { .. }
        )
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            Error::Config(msg) => (StatusCode::BAD_REQUEST, "config_error", msg.clone()),
            Error::Transport(msg) => (StatusCode::BAD_GATEWAY, "transport_error", msg.clone()),
            Error::SchemaViolation(msg) => {
                (StatusCode::BAD_GATEWAY, "schema_violation", msg.clone())
            }
            Error::IngestionFailed { .. } => (
                StatusCode::BAD_GATEWAY,
                "ingestion_failed",
                INGESTION_RETRY_MESSAGE.to_string(),
            ),
            Error::CustomerNotFound(id) => (
                StatusCode::NOT_FOUND,
                "not_found",
                format!("Customer not found: {}", id),
            ),
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            Error::Busy(msg) => (StatusCode::CONFLICT, "busy", msg.clone()),
            Error::Io(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "io_error",
                err.to_string(),
            ),
            Error::Json(err) => (StatusCode::BAD_REQUEST, "json_error", err.to_string()),
            Error::Toml(err) => (StatusCode::BAD_REQUEST, "config_error", err.to_string()),
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
