//! Helpers used by generated HTTP clients.

use std::path::{Path, PathBuf};

use reqwest::header::HeaderMap;
use reqwest::multipart::Part;
use url::Url;

use crate::error::ClientError;

/// Builds the HTTP client generated clients use by default.
///
/// Redirects are not followed so that redirect responses reach the caller
/// as declared variants.
pub fn http_client() -> Result<reqwest::Client, ClientError> {
    Ok(reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()?)
}

/// Joins a base URL and a path template, percent-encoding substituted values.
///
/// ## Examples
///
/// ```
/// use bindery::client::endpoint_url;
///
/// let url = endpoint_url(
///     "http://localhost:8080/api/",
///     "/pets/{petId}/avatar",
///     &[("petId", "a b".to_string())],
/// )
/// .unwrap();
/// assert_eq!(url.as_str(), "http://localhost:8080/api/pets/a%20b/avatar");
/// ```
pub fn endpoint_url(
    base_url: &str,
    template: &str,
    params: &[(&str, String)],
) -> Result<Url, ClientError> {
    let mut url = Url::parse(base_url).map_err(|e| ClientError::InvalidBaseUrl(e.to_string()))?;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| ClientError::InvalidBaseUrl(base_url.to_string()))?;
        segments.pop_if_empty();
        for segment in template.split('/').filter(|s| !s.is_empty()) {
            let mut value = segment.to_string();
            for (name, param) in params {
                value = value.replace(&format!("{{{}}}", name), param);
            }
            segments.push(&value);
        }
    }
    Ok(url)
}

fn header_text<'a>(headers: &'a HeaderMap, name: &str) -> Result<Option<&'a str>, ClientError> {
    match headers.get(name) {
        None => Ok(None),
        Some(value) => value
            .to_str()
            .map(Some)
            .map_err(|_| ClientError::InvalidHeader(name.to_string())),
    }
}

/// Reads a response header that must be present.
pub fn required_header<T>(
    headers: &HeaderMap,
    name: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, ClientError> {
    optional_header(headers, name, parse)?.ok_or_else(|| ClientError::MissingHeader(name.to_string()))
}

/// Reads a response header that may be absent.
pub fn optional_header<T>(
    headers: &HeaderMap,
    name: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>, ClientError> {
    header_text(headers, name)?
        .map(|raw| parse(raw).ok_or_else(|| ClientError::InvalidHeader(name.to_string())))
        .transpose()
}

/// Reads a file from disk into a multipart part.
pub async fn file_part(file_name: &str, path: &Path, content_type: &str) -> Result<Part, ClientError> {
    let bytes = tokio::fs::read(path).await?;
    Ok(Part::bytes(bytes)
        .file_name(file_name.to_string())
        .mime_str(content_type)?)
}

/// Saves a binary response body to a temporary file the caller owns.
pub async fn download_to_temp(response: reqwest::Response) -> Result<PathBuf, ClientError> {
    let bytes = response.bytes().await?;
    let temp = tempfile::Builder::new()
        .prefix("bindery-download-")
        .suffix(".tmp")
        .tempfile()?;
    let (_, path) = temp.keep().map_err(|e| e.error)?;
    tokio::fs::write(&path, &bytes).await?;
    Ok(path)
}

/// Turns an undeclared status into an error, keeping the body for diagnostics.
pub async fn unexpected_status(response: reqwest::Response) -> ClientError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ClientError::UnexpectedStatus { status, body }
}
