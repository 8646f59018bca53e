//! Request body descriptors.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::types::TypeDescriptor;

/// Media types a request body may be sent as.
///
/// The [`Display`] form is the variant tag used in generated sum types.
///
/// ## Examples
///
/// ```
/// use bindery_define::MediaType;
///
/// let media = MediaType::from_mime("multipart/form-data").unwrap();
/// assert_eq!(media, MediaType::MultipartForm);
/// assert_eq!(media.to_string(), "MultipartForm");
/// assert_eq!(MediaType::from_mime("text/plain"), None);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
    EnumIter,
)]
pub enum MediaType {
    /// `application/json`
    Json,
    /// `application/xml` (recognized, not parsed)
    Xml,
    /// `application/x-www-form-urlencoded`
    Form,
    /// `multipart/form-data`
    MultipartForm,
}

impl MediaType {
    /// Returns the MIME type string.
    pub fn mime(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Xml => "application/xml",
            Self::Form => "application/x-www-form-urlencoded",
            Self::MultipartForm => "multipart/form-data",
        }
    }

    /// Looks up a media type by its MIME string.
    pub fn from_mime(mime: &str) -> Option<Self> {
        use strum::IntoEnumIterator;
        Self::iter().find(|m| m.mime() == mime)
    }
}

/// A resolved request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    /// Name of the generated sum type, `<OperationId>Request`.
    pub class_name: String,
    /// Whether the request must carry a body.
    pub required: bool,
    /// Accepted media types in document order.
    pub content: IndexMap<MediaType, TypeDescriptor>,
}

impl RequestBody {
    /// Combined view: one variant per media type, each carrying its body type.
    pub fn one_of(&self) -> TypeDescriptor {
        TypeDescriptor::OneOf {
            name: self.class_name.clone(),
            variants: self
                .content
                .iter()
                .map(|(media, ty)| (media.to_string(), vec![ty.clone()]))
                .collect(),
        }
    }
}
