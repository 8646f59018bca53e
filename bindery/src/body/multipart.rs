use std::path::PathBuf;

use axum::extract::{FromRequest, Multipart, Request};
use bytes::Bytes;

use super::form::field_value;
use crate::cleanup::CleanupRegistry;
use crate::error::BodyError;

const DEFAULT_PART_CONTENT_TYPE: &str = "application/octet-stream";

/// One buffered part of a multipart body.
#[derive(Debug, Clone)]
pub struct Part {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// A file part materialized on disk.
///
/// The file belongs to the request's [`CleanupRegistry`] and is deleted
/// when the request completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Original file name, or the field name when the client sent none.
    pub name: String,
    pub path: PathBuf,
    pub content_type: String,
}

/// All parts of a `multipart/form-data` body, fully buffered.
///
/// Text fields can be read before any file is written, so a request that
/// fails validation never touches the disk.
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    parts: Vec<Part>,
}

impl MultipartForm {
    pub fn new(parts: Vec<Part>) -> Self {
        Self { parts }
    }

    pub(crate) async fn from_request(request: Request) -> Result<Self, BodyError> {
        let mut multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| BodyError::Multipart(e.body_text()))?;

        let mut parts = Vec::new();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| BodyError::Multipart(e.body_text()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|e| BodyError::Multipart(e.body_text()))?;
            parts.push(Part {
                name,
                file_name,
                content_type,
                data,
            });
        }
        tracing::trace!(parts = parts.len(), "multipart body buffered");
        Ok(Self { parts })
    }

    /// First part with the given field name.
    pub fn part(&self, name: &str) -> Option<&Part> {
        self.parts.iter().find(|p| p.name == name)
    }

    fn text(&self, name: &str) -> Result<Option<&str>, BodyError> {
        self.part(name)
            .map(|p| std::str::from_utf8(&p.data).map_err(|_| BodyError::InvalidField(name.to_string())))
            .transpose()
    }

    /// Reads a text field that must be present and non-empty.
    pub fn required<T>(
        &self,
        name: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<T, BodyError> {
        self.optional(name, parse)?
            .ok_or_else(|| BodyError::MissingField(name.to_string()))
    }

    /// Reads a text field that may be absent.
    pub fn optional<T>(
        &self,
        name: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<Option<T>, BodyError> {
        field_value(name, self.text(name)?, parse)
    }

    /// Writes a file part that must be present to a temporary file.
    pub async fn required_file(
        &self,
        name: &str,
        cleanup: &mut CleanupRegistry,
    ) -> Result<UploadedFile, BodyError> {
        self.optional_file(name, cleanup)
            .await?
            .ok_or_else(|| BodyError::MissingField(name.to_string()))
    }

    /// Writes a file part to a temporary file, if present.
    ///
    /// Deletion is registered before the file is written.
    pub async fn optional_file(
        &self,
        name: &str,
        cleanup: &mut CleanupRegistry,
    ) -> Result<Option<UploadedFile>, BodyError> {
        let Some(part) = self.part(name) else {
            return Ok(None);
        };

        let temp = tempfile::Builder::new()
            .prefix("bindery-part-")
            .suffix(".tmp")
            .tempfile()?;
        let (_, path) = temp.keep().map_err(|e| e.error)?;
        cleanup.remove_file(&path);
        tokio::fs::write(&path, &part.data).await?;

        tracing::debug!(field = name, path = %path.display(), "stored multipart file");
        Ok(Some(UploadedFile {
            name: part.file_name.clone().unwrap_or_else(|| part.name.clone()),
            path,
            content_type: part
                .content_type
                .clone()
                .unwrap_or_else(|| DEFAULT_PART_CONTENT_TYPE.to_string()),
        }))
    }
}
