//! Errors of the generator pipeline: load, resolve, emit, write.

use thiserror::Error;

use crate::resolver::ResolveError;

/// Errors that can occur during code generation.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// The OpenAPI document could not be read or deserialized
    #[error("Failed to load OpenAPI document: {0}")]
    ParseError(String),

    /// The document uses something the type model cannot represent
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// An emitter produced, or would produce, invalid Rust
    #[error("Code generation failed: {0}")]
    CodeGenError(String),

    /// A generated file could not be written
    #[error("Failed to write '{path}': {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The directory that should contain the output is missing
    #[error("Output directory '{0}' does not exist")]
    OutputDirNotFound(String),

    /// A target or `bindery.toml` is invalid
    #[error("Invalid target configuration: {0}")]
    ConfigError(String),
}

impl From<bindery_define::DocumentError> for GeneratorError {
    fn from(err: bindery_define::DocumentError) -> Self {
        Self::ParseError(err.to_string())
    }
}
