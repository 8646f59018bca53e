//! Shared test utilities for bindery-gen tests.

use bindery_define::{OpenApiDocument, SpecMetadata};

use crate::output::{SourceFile, format_code, validate_code};
use crate::resolver::resolve;

/// The sample Petstore document.
pub const PET_STORE: &str = include_str!("../../sample/openapi/petstore.yaml");

/// The sample document, resolved with the `petstore` prefix.
pub fn pet_store_metadata() -> SpecMetadata {
    let doc = OpenApiDocument::from_yaml_str(PET_STORE).expect("sample document parses");
    resolve(&doc, "petstore").expect("sample document resolves")
}

/// Validates and formats one generated module.
pub fn rendered(file: &SourceFile) -> String {
    let parsed = validate_code(&file.tokens).expect("generated code parses");
    format_code(&parsed)
}

/// Strips all whitespace and the trailing commas `prettyplease` adds to
/// wrapped argument and array lists, so assertions do not depend on line
/// breaks.
pub fn compact(code: &str) -> String {
    let code: String = code.chars().filter(|c| !c.is_whitespace()).collect();
    code.replace(",)", ")").replace(",]", "]")
}
