//! Generation targets and the `bindery.toml` configuration file.
//!
//! A target pairs one OpenAPI document with one output module. Targets come
//! either from CLI flags or from a configuration file:
//!
//! ```toml
//! [targets.petstore]
//! spec = "openapi/petstore.yaml"
//! output = "src/petstore"
//! name_prefix = "Petstore"
//! client = true
//! ```
//!
//! Relative paths in the file are resolved against the file's directory.

use std::fs;
use std::path::{Path, PathBuf};

use bindery_define::naming::{field_ident, pascal_case};
use indexmap::IndexMap;
use serde::Deserialize;

use crate::errors::GeneratorError;

/// One document to compile into one module.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TargetConfig {
    /// Module name of the generated code; the table key in `bindery.toml`.
    #[serde(skip)]
    pub name: String,
    /// Path to the OpenAPI document.
    pub spec: PathBuf,
    /// Output directory (file tree) or file (bundle).
    pub output: PathBuf,
    /// Prefix for `<Prefix>Spec`, `<Prefix>Controller` and `<Prefix>Client`.
    pub name_prefix: Option<String>,
    /// Whether to emit the HTTP client.
    #[serde(default)]
    pub client: bool,
    /// Write one file with inline modules instead of a file tree.
    #[serde(default)]
    pub bundle: bool,
}

impl TargetConfig {
    pub fn new(name: impl Into<String>, spec: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            spec: spec.into(),
            output: output.into(),
            name_prefix: None,
            client: false,
            bundle: false,
        }
    }

    pub fn with_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = Some(prefix.into());
        self
    }

    pub fn with_client(mut self, client: bool) -> Self {
        self.client = client;
        self
    }

    pub fn with_bundle(mut self, bundle: bool) -> Self {
        self.bundle = bundle;
        self
    }

    /// The type name prefix, defaulting to the PascalCase module name.
    pub fn prefix(&self) -> String {
        pascal_case(self.name_prefix.as_deref().unwrap_or(&self.name))
    }

    /// Checks that the names produce valid Rust identifiers.
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if self.name.is_empty() || field_ident(&self.name) != self.name {
            return Err(GeneratorError::ConfigError(format!(
                "target name '{}' is not a snake_case module name",
                self.name
            )));
        }
        let prefix = self.prefix();
        if prefix.is_empty()
            || !prefix.chars().all(|c| c.is_ascii_alphanumeric())
            || prefix.starts_with(|c: char| c.is_ascii_digit())
        {
            return Err(GeneratorError::ConfigError(format!(
                "name prefix '{}' must be alphanumeric and start with a letter",
                prefix
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    targets: IndexMap<String, TargetConfig>,
}

/// Parses `bindery.toml` content. Paths are left as written.
pub fn targets_from_toml_str(source: &str) -> Result<Vec<TargetConfig>, GeneratorError> {
    let file: ConfigFile =
        toml::from_str(source).map_err(|e| GeneratorError::ConfigError(e.to_string()))?;
    let targets: Vec<TargetConfig> = file
        .targets
        .into_iter()
        .map(|(name, target)| TargetConfig { name, ..target })
        .collect();
    for target in &targets {
        target.validate()?;
    }
    Ok(targets)
}

/// Loads `bindery.toml`, resolving relative paths against its directory.
pub fn load_targets(path: &Path) -> Result<Vec<TargetConfig>, GeneratorError> {
    let source = fs::read_to_string(path).map_err(|e| {
        GeneratorError::ConfigError(format!("cannot read '{}': {}", path.display(), e))
    })?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    Ok(targets_from_toml_str(&source)?
        .into_iter()
        .map(|target| TargetConfig {
            spec: base.join(&target.spec),
            output: base.join(&target.output),
            ..target
        })
        .collect())
}
