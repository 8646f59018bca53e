//! Errors returned by generated route handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use super::{RequestError, ServiceError};

/// Everything a generated handler can fail with.
///
/// Request errors render as the structured 400 body; all other variants
/// are logged and answered with a bare 500.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The request was rejected before the contract was invoked.
    #[error(transparent)]
    Request(#[from] RequestError),

    /// The contract implementation failed.
    #[error("Service failed: {0}")]
    Service(#[from] ServiceError),

    /// The `code` of a default response is not a valid HTTP status.
    #[error("Invalid response status code: {0}")]
    InvalidStatus(i64),

    /// A response header value cannot be encoded.
    #[error("Invalid value for response header '{name}'")]
    InvalidHeader { name: String },

    /// The response body could not be serialized.
    #[error("Failed to serialize response: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A response file could not be read.
    #[error("Failed to read response file: {0}")]
    Io(#[from] std::io::Error),
}

impl HandlerError {
    /// The HTTP status this error is answered with.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Request(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        match self {
            Self::Request(err) => err.into_response(),
            other => {
                tracing::error!(error = %other, "request handler failed");
                other.status().into_response()
            }
        }
    }
}
