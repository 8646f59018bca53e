//! OpenAPI 3 document model for serde deserialization.
//!
//! Only the subset the resolver reads is modelled. Unknown keys are ignored,
//! and maps keep document order so generated code follows the order the
//! author wrote.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::DocumentError;

/// Root of an OpenAPI document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenApiDocument {
    pub openapi: Option<String>,
    pub info: Option<Info>,
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
    #[serde(default)]
    pub components: Components,
    /// Document-wide security requirements.
    pub security: Option<Vec<SecurityRequirement>>,
}

/// Security requirement: scheme name to scopes.
pub type SecurityRequirement = IndexMap<String, Vec<String>>;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Info {
    pub title: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
}

/// Reusable definitions.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    #[serde(default)]
    pub schemas: IndexMap<String, Schema>,
    #[serde(default)]
    pub parameters: IndexMap<String, ParameterOrRef>,
    #[serde(default)]
    pub security_schemes: IndexMap<String, SecuritySchemeObject>,
}

/// Operations available on a single path.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathItem {
    pub get: Option<Operation>,
    pub post: Option<Operation>,
    pub put: Option<Operation>,
    pub patch: Option<Operation>,
    pub delete: Option<Operation>,
    /// Path-level parameters shared by all operations.
    #[serde(default)]
    pub parameters: Vec<ParameterOrRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterOrRef>,
    pub request_body: Option<RequestBodyObject>,
    #[serde(default)]
    pub responses: IndexMap<String, ResponseObject>,
    /// Overrides the document-wide requirements; an empty list disables security.
    pub security: Option<Vec<SecurityRequirement>>,
}

/// A parameter or a `$ref` to `#/components/parameters/...`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ParameterOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Parameter(Parameter),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: String,
    #[serde(default)]
    pub required: bool,
    pub schema: Option<Schema>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestBodyObject {
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub content: IndexMap<String, MediaTypeObject>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseObject {
    pub description: Option<String>,
    #[serde(default)]
    pub headers: IndexMap<String, HeaderObject>,
    #[serde(default)]
    pub content: IndexMap<String, MediaTypeObject>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HeaderObject {
    #[serde(default)]
    pub required: bool,
    pub schema: Option<Schema>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaTypeObject {
    pub schema: Option<Schema>,
}

/// Entry of `components.securitySchemes`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecuritySchemeObject {
    #[serde(rename = "type")]
    pub scheme_type: String,
    /// For `http` schemes, e.g. `bearer`.
    pub scheme: Option<String>,
    /// For `apiKey` schemes.
    pub name: Option<String>,
    /// For `apiKey` schemes: `header`, `query` or `cookie`.
    #[serde(rename = "in")]
    pub location: Option<String>,
    pub bearer_format: Option<String>,
}

/// JSON Schema subset used by OpenAPI.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(rename = "$ref")]
    pub ref_path: Option<String>,
    #[serde(rename = "type")]
    pub schema_type: Option<String>,
    pub format: Option<String>,
    #[serde(default)]
    pub properties: IndexMap<String, Schema>,
    #[serde(default)]
    pub required: Vec<String>,
    pub items: Option<Box<Schema>>,
    pub additional_properties: Option<serde_json::Value>,
    pub one_of: Option<Vec<Schema>>,
    pub any_of: Option<Vec<Schema>>,
    pub all_of: Option<Vec<Schema>>,
    pub description: Option<String>,
}

impl Schema {
    /// Returns `true` if the schema uses a composition keyword.
    pub fn is_composition(&self) -> bool {
        self.one_of.is_some() || self.any_of.is_some() || self.all_of.is_some()
    }

    /// Returns `true` for `type: string, format: binary`.
    pub fn is_binary(&self) -> bool {
        self.schema_type.as_deref() == Some("string") && self.format.as_deref() == Some("binary")
    }
}

impl OpenApiDocument {
    /// Parses a YAML document.
    pub fn from_yaml_str(source: &str) -> Result<Self, DocumentError> {
        Ok(serde_yaml::from_str(source)?)
    }

    /// Parses a JSON document.
    pub fn from_json_str(source: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Loads a document from disk. `.json` files are parsed as JSON, anything
    /// else as YAML.
    pub fn from_path(path: &Path) -> Result<Self, DocumentError> {
        let source = fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.display().to_string(),
            source,
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&source),
            _ => Self::from_yaml_str(&source),
        }
    }

    /// Looks up a schema by `$ref` pointer (`#/components/schemas/Name`).
    pub fn schema(&self, pointer: &str) -> Option<&Schema> {
        let name = pointer.strip_prefix("#/components/schemas/")?;
        self.components.schemas.get(name)
    }

    /// Looks up a parameter by `$ref` pointer (`#/components/parameters/Name`).
    pub fn parameter(&self, pointer: &str) -> Option<&ParameterOrRef> {
        let name = pointer.strip_prefix("#/components/parameters/")?;
        self.components.parameters.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r##"
openapi: 3.0.0
info:
  title: Minimal
  version: 1.0.0
paths:
  /pets/{petId}:
    parameters:
      - $ref: '#/components/parameters/petId'
    get:
      operationId: showPetById
      responses:
        '200':
          description: ok
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/Pet'
components:
  parameters:
    petId:
      name: petId
      in: path
      required: true
      schema:
        type: string
  schemas:
    Pet:
      type: object
      required: [id]
      properties:
        id:
          type: integer
          format: int64
        name:
          type: string
"##;

    #[test]
    fn parses_yaml_document() {
        let doc = OpenApiDocument::from_yaml_str(MINIMAL).unwrap();
        let item = &doc.paths["/pets/{petId}"];
        let op = item.get.as_ref().unwrap();
        assert_eq!(op.operation_id.as_deref(), Some("showPetById"));
        assert!(matches!(item.parameters[0], ParameterOrRef::Ref { .. }));
        assert!(op.responses.contains_key("200"));
    }

    #[test]
    fn schema_lookup_by_pointer() {
        let doc = OpenApiDocument::from_yaml_str(MINIMAL).unwrap();
        let pet = doc.schema("#/components/schemas/Pet").unwrap();
        assert_eq!(pet.required, vec!["id".to_string()]);
        assert_eq!(pet.properties.keys().collect::<Vec<_>>(), vec!["id", "name"]);
        assert!(doc.schema("#/components/schemas/Missing").is_none());
        assert!(doc.schema("#/definitions/Pet").is_none());
    }

    #[test]
    fn parameter_lookup_by_pointer() {
        let doc = OpenApiDocument::from_yaml_str(MINIMAL).unwrap();
        match doc.parameter("#/components/parameters/petId") {
            Some(ParameterOrRef::Parameter(p)) => {
                assert_eq!(p.name, "petId");
                assert!(p.required);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn parses_json_document() {
        let doc = OpenApiDocument::from_json_str(
            r#"{"openapi":"3.0.0","paths":{"/ping":{"get":{"operationId":"ping","responses":{"204":{"description":"pong"}}}}}}"#,
        )
        .unwrap();
        assert_eq!(doc.paths.len(), 1);
    }

    #[test]
    fn from_path_reads_by_extension() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("api.yaml");
        fs::write(&path, MINIMAL).unwrap();
        let doc = OpenApiDocument::from_path(&path).unwrap();
        assert_eq!(doc.info.and_then(|i| i.title).as_deref(), Some("Minimal"));
    }

    #[test]
    fn from_path_missing_file() {
        let err = OpenApiDocument::from_path(Path::new("/nonexistent/api.yaml")).unwrap_err();
        assert!(matches!(err, DocumentError::Io { .. }));
    }

    #[test]
    fn binary_schema_detection() {
        let schema: Schema = serde_yaml::from_str("type: string\nformat: binary").unwrap();
        assert!(schema.is_binary());
        assert!(!schema.is_composition());
    }
}
