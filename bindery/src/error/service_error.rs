//! Contract implementation failures.

use std::error::Error as StdError;

use thiserror::Error;

/// Failure returned by a contract implementation.
///
/// Carries no HTTP concepts; bindings report it as a 500.
///
/// ## Examples
///
/// ```
/// use bindery::ServiceError;
///
/// let err = ServiceError::new("storage unavailable");
/// assert_eq!(err.to_string(), "storage unavailable");
/// ```
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ServiceError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl ServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wraps an underlying error.
    pub fn with_source(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source("I/O failure", err)
    }
}
