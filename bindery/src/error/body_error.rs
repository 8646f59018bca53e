//! Body extraction failures.

use thiserror::Error;

use super::RequestError;

/// Failures while decoding a request body.
///
/// Only [`BodyError::Request`] carries a structured rejection; every other
/// variant is reported to the caller as [`RequestError::IllegalBody`] by
/// [`valid_body`].
#[derive(Debug, Error)]
pub enum BodyError {
    /// An already classified rejection, passed through unchanged.
    #[error(transparent)]
    Request(#[from] RequestError),

    /// The body stream could not be read.
    #[error("Failed to read request body: {0}")]
    Read(String),

    /// JSON decoding failed.
    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    /// A required form field is absent.
    #[error("Missing form field '{0}'")]
    MissingField(String),

    /// A form field could not be parsed into its declared type.
    #[error("Invalid form field '{0}'")]
    InvalidField(String),

    /// The multipart stream is malformed.
    #[error("Multipart error: {0}")]
    Multipart(String),

    /// The media type is recognized but not decoded.
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// A temporary file could not be written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Converts a body extraction result into the request taxonomy.
///
/// Structured rejections pass through; anything else becomes `illegalBody`.
///
/// ## Examples
///
/// ```
/// use bindery::{BodyError, RequestError, valid_body};
///
/// let passed: Result<(), _> = valid_body(Err(BodyError::Request(RequestError::NoBodyFound)));
/// assert_eq!(passed, Err(RequestError::NoBodyFound));
///
/// let wrapped: Result<(), _> = valid_body(Err(BodyError::MissingField("name".into())));
/// assert_eq!(wrapped, Err(RequestError::IllegalBody));
/// ```
pub fn valid_body<T>(result: Result<T, BodyError>) -> Result<T, RequestError> {
    match result {
        Ok(value) => Ok(value),
        Err(BodyError::Request(err)) => Err(err),
        Err(err) => {
            tracing::debug!(error = %err, "request body rejected");
            Err(RequestError::IllegalBody)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_passes_through() {
        assert_eq!(valid_body(Ok::<_, BodyError>(5)), Ok(5));
    }

    #[test]
    fn test_structured_error_is_preserved() {
        let err = BodyError::Request(RequestError::bad_param_format("id"));
        assert_eq!(
            valid_body::<()>(Err(err)),
            Err(RequestError::bad_param_format("id"))
        );
    }

    #[test]
    fn test_json_error_becomes_illegal_body() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(
            valid_body::<()>(Err(BodyError::Json(json_err))),
            Err(RequestError::IllegalBody)
        );
    }

    #[test]
    fn test_unsupported_media_becomes_illegal_body() {
        let err = BodyError::UnsupportedMediaType("application/xml".into());
        assert_eq!(valid_body::<()>(Err(err)), Err(RequestError::IllegalBody));
    }
}
