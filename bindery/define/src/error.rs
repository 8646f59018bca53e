//! Document loading errors.

use thiserror::Error;

/// Errors raised while reading an OpenAPI document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The file could not be read.
    #[error("Failed to read API document '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The YAML is malformed or does not match the document model.
    #[error("Invalid YAML document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The JSON is malformed or does not match the document model.
    #[error("Invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),
}
