//! Request body extraction.
//!
//! Bindings pick a decoder by the primary content-type token and build the
//! body value field by field. Decoders report [`BodyError`]s which
//! [`crate::valid_body`] folds into the request taxonomy.
//!
//! - [`read_json`] - JSON into any deserializable type
//! - [`read_form`] - `application/x-www-form-urlencoded` into [`FormFields`]
//! - [`read_multipart`] - `multipart/form-data` into [`MultipartForm`]

mod form;
mod multipart;

use axum::body::to_bytes;
use axum::extract::Request;
use axum::http::HeaderMap;
use axum::http::header::CONTENT_TYPE;
use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::error::BodyError;

pub use form::FormFields;
pub use multipart::{MultipartForm, Part, UploadedFile};

/// Largest body a binding will buffer.
pub const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

/// Returns the media type of the request without parameters, lowercased.
///
/// ```
/// use axum::http::{HeaderMap, HeaderValue, header::CONTENT_TYPE};
/// use bindery::primary_content_type;
///
/// let mut headers = HeaderMap::new();
/// headers.insert(CONTENT_TYPE, HeaderValue::from_static("Application/JSON; charset=utf-8"));
/// assert_eq!(primary_content_type(&headers).as_deref(), Some("application/json"));
///
/// assert_eq!(primary_content_type(&HeaderMap::new()), None);
/// ```
pub fn primary_content_type(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(CONTENT_TYPE)?.to_str().ok()?;
    let primary = value.split(';').next()?.trim();
    if primary.is_empty() {
        return None;
    }
    Some(primary.to_ascii_lowercase())
}

/// Buffers the whole body.
pub async fn read_bytes(request: Request) -> Result<Bytes, BodyError> {
    to_bytes(request.into_body(), MAX_BODY_BYTES)
        .await
        .map_err(|e| BodyError::Read(e.to_string()))
}

/// Decodes a JSON body.
pub async fn read_json<T: DeserializeOwned>(request: Request) -> Result<T, BodyError> {
    let bytes = read_bytes(request).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Decodes a url-encoded form body.
pub async fn read_form(request: Request) -> Result<FormFields, BodyError> {
    let bytes = read_bytes(request).await?;
    Ok(FormFields::parse(&bytes))
}

/// Buffers every part of a multipart body.
pub async fn read_multipart(request: Request) -> Result<MultipartForm, BodyError> {
    MultipartForm::from_request(request).await
}

/// Rejects a media type that is recognized but has no decoder.
pub fn unsupported_media<T>(media_type: &str) -> Result<T, BodyError> {
    Err(BodyError::UnsupportedMediaType(media_type.to_string()))
}
