//! Errors of generated HTTP clients.

use thiserror::Error;

/// Failures of a generated client call.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed due to network or protocol error, or the body
    /// could not be decoded.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a status the operation does not declare.
    #[error("Unexpected HTTP status {status}: {body}")]
    UnexpectedStatus {
        /// The HTTP status code returned.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// A required response header is missing.
    #[error("Missing response header '{0}'")]
    MissingHeader(String),

    /// A response header cannot be parsed into its declared type.
    #[error("Invalid response header '{0}'")]
    InvalidHeader(String),

    /// The base URL cannot carry a path.
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// The request body media type is not supported by the client.
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// Reading an upload or writing a download failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Returns `true` if retrying the call may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::UnexpectedStatus { status, .. } => *status >= 500 || *status == 429,
            Self::Request(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Returns the HTTP status code, if one was received.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_500_is_retryable() {
        let err = ClientError::UnexpectedStatus {
            status: 503,
            body: String::new(),
        };
        assert!(err.is_retryable());
        assert_eq!(err.status_code(), Some(503));
    }

    #[test]
    fn test_400_not_retryable() {
        let err = ClientError::UnexpectedStatus {
            status: 400,
            body: "{}".to_string(),
        };
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_missing_header_has_no_status() {
        let err = ClientError::MissingHeader("Location".into());
        assert_eq!(err.status_code(), None);
        assert!(err.to_string().contains("Location"));
    }
}
