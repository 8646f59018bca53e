//! Response construction for generated handlers.

use std::path::Path;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::error::HandlerError;

/// Builds one response: status, declared headers, then a body.
///
/// ## Examples
///
/// ```
/// use axum::http::StatusCode;
/// use bindery::ResponseWriter;
///
/// let mut writer = ResponseWriter::from_code(302).unwrap();
/// writer.header("Location", "https://example.com").unwrap();
/// let response = writer.empty().unwrap();
///
/// assert_eq!(response.status(), StatusCode::FOUND);
/// assert_eq!(response.headers()["location"], "https://example.com");
/// ```
#[derive(Debug)]
pub struct ResponseWriter {
    status: StatusCode,
    headers: HeaderMap,
}

impl ResponseWriter {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
        }
    }

    /// Starts a response from a numeric code, such as the `code` field of a
    /// default response body.
    pub fn from_code(code: i64) -> Result<Self, HandlerError> {
        let status = u16::try_from(code)
            .ok()
            .and_then(|c| StatusCode::from_u16(c).ok())
            .ok_or(HandlerError::InvalidStatus(code))?;
        Ok(Self::new(status))
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Sets a header, replacing any previous value.
    pub fn header(&mut self, name: &str, value: impl ToString) -> Result<(), HandlerError> {
        let invalid = || HandlerError::InvalidHeader {
            name: name.to_string(),
        };
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
        let header_value = HeaderValue::from_str(&value.to_string()).map_err(|_| invalid())?;
        self.headers.insert(header_name, header_value);
        Ok(())
    }

    /// Finishes with a JSON body.
    pub fn json<T: Serialize>(self, body: &T) -> Result<Response, HandlerError> {
        let bytes = serde_json::to_vec(body)?;
        let mut response = (self.status, self.headers, Body::from(bytes)).into_response();
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(response)
    }

    /// Finishes without a body.
    pub fn empty(self) -> Result<Response, HandlerError> {
        Ok((self.status, self.headers).into_response())
    }

    /// Finishes with the content of a file handed back by the contract.
    ///
    /// Deleting the file is up to the caller, who registers it with the
    /// request's [`CleanupRegistry`](crate::CleanupRegistry) before writing
    /// any header.
    pub async fn file(self, path: &Path) -> Result<Response, HandlerError> {
        let bytes = tokio::fs::read(path).await?;
        let mut response = (self.status, self.headers, Body::from(bytes)).into_response();
        response.headers_mut().insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/octet-stream"),
        );
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_from_code_rejects_invalid_status() {
        assert!(matches!(
            ResponseWriter::from_code(42),
            Err(HandlerError::InvalidStatus(42))
        ));
        assert!(matches!(
            ResponseWriter::from_code(-1),
            Err(HandlerError::InvalidStatus(-1))
        ));
        assert_eq!(ResponseWriter::from_code(404).unwrap().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_invalid_header_value() {
        let mut writer = ResponseWriter::new(StatusCode::OK);
        let err = writer.header("x-next", "line\nbreak").unwrap_err();
        assert!(matches!(err, HandlerError::InvalidHeader { name } if name == "x-next"));
    }

    #[tokio::test]
    async fn test_json_body_and_headers() {
        let mut writer = ResponseWriter::new(StatusCode::OK);
        writer.header("x-next", 7).unwrap();
        let response = writer.json(&serde_json::json!({ "pets": [] })).unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-next"], "7");
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body.as_ref(), br#"{"pets":[]}"#);
    }

    #[tokio::test]
    async fn test_file_body() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("avatar.bin");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();

        let response = ResponseWriter::new(StatusCode::OK).file(&path).await.unwrap();
        assert_eq!(response.headers()[CONTENT_TYPE], "application/octet-stream");
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body.as_ref(), &[1, 2, 3]);
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_file_registered_before_a_failing_header_is_deleted() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("avatar.bin");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();

        async fn respond(path: &Path) -> Result<Response, HandlerError> {
            let mut cleanup = crate::CleanupRegistry::new();
            cleanup.remove_file(path);
            let mut writer = ResponseWriter::new(StatusCode::OK);
            writer.header("x-note", "line\nbreak")?;
            writer.file(path).await
        }

        let result = respond(&path).await;
        assert!(matches!(result, Err(HandlerError::InvalidHeader { .. })));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let result = ResponseWriter::new(StatusCode::OK)
            .file(Path::new("/nonexistent/avatar.bin"))
            .await;
        assert!(matches!(result, Err(HandlerError::Io(_))));
    }
}
