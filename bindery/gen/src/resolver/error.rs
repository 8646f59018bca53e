use thiserror::Error;

/// Constructs the type model cannot represent. Every variant aborts the run
/// before any output is written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("Operation {method} {path} has no operationId")]
    MissingOperationId { method: String, path: String },

    #[error("{context} '{name}' does not yield a usable type name")]
    InvalidName { name: String, context: String },

    #[error("Unresolvable reference '{pointer}'")]
    UnresolvedRef { pointer: String },

    #[error("Unsupported schema type '{schema_type}' in {context}")]
    UnsupportedType { schema_type: String, context: String },

    #[error("Schema composition (allOf/anyOf/oneOf) is not supported in {context}")]
    UnsupportedComposition { context: String },

    #[error("Array schema in {context} has no items")]
    MissingItems { context: String },

    #[error("Security scheme '{name}' is not declared in components.securitySchemes")]
    UnknownSecurityScheme { name: String },

    #[error("Security scheme '{name}' is not supported: {reason}")]
    UnsupportedSecurityScheme { name: String, reason: String },

    #[error("Parameter '{name}' of '{operation_id}' has unsupported location '{location}'")]
    UnsupportedParamLocation {
        name: String,
        operation_id: String,
        location: String,
    },

    #[error("Parameter '{name}' of '{operation_id}' must have a primitive schema")]
    NonPrimitiveParam { name: String, operation_id: String },

    #[error("Path parameter '{name}' of '{path}' is not declared")]
    UndeclaredPathParam { name: String, path: String },

    #[error("Response header '{name}' of '{operation_id}' must have a primitive schema")]
    NonPrimitiveHeader { name: String, operation_id: String },

    #[error("Response status '{status}' of '{operation_id}' is not a status code")]
    UnsupportedStatus { status: String, operation_id: String },

    #[error("Response {status} of '{operation_id}' has no body and no known variant name")]
    UnmappedStatus { status: String, operation_id: String },

    #[error(
        "Default response of '{operation_id}' must have an object body with a required integer 'code' field"
    )]
    DefaultWithoutCode { operation_id: String },

    #[error("Responses of '{operation_id}' map to the same variant name '{name}'")]
    DuplicateVariant { name: String, operation_id: String },
}
