//! Bindery definition library.
//!
//! This crate holds the data shapes shared by the bindery code generator:
//! the raw OpenAPI document model it reads, and the type descriptor model
//! it resolves that document into. The descriptors are consumed by
//! `bindery-gen` to emit a server contract, data models, HTTP bindings and
//! a client that all agree on the same names.
//!
//! ## Core Types
//!
//! ### Document Model
//!
//! - [`OpenApiDocument`] - An OpenAPI 3 document (YAML or JSON)
//! - [`openapi::Schema`] - The JSON Schema subset the resolver understands
//!
//! ### Type Descriptors
//!
//! - [`SpecMetadata`] - Resolved operations plus the reference table
//! - [`OperationDescriptor`] - One path + method with params, body and responses
//! - [`ParamDescriptor`] - A query, path or header parameter
//! - [`TypeDescriptor`] - The shape of a value (primitive, array, object, sum, ref)
//! - [`RequestBody`] / [`MediaType`] - Accepted request encodings
//! - [`ResponseBody`] / [`ResponseVariant`] / [`ResponseStatus`] - Per-status results
//! - [`SecurityScheme`] - Authentication surfaced as an implicit parameter
//! - [`RefTable`] - Write-once table of resolved `$ref` targets
//!
//! ### Naming
//!
//! - [`naming`] - Case conversions every emitter derives identifiers with
//!
//! ## Examples
//!
//! ```
//! use bindery_define::{OpenApiDocument, naming};
//!
//! let doc = OpenApiDocument::from_yaml_str(r#"
//! openapi: 3.0.0
//! paths:
//!   /pets:
//!     get:
//!       operationId: listPets
//!       responses:
//!         '200':
//!           description: ok
//! "#).unwrap();
//!
//! let op = doc.paths["/pets"].get.as_ref().unwrap();
//! let id = op.operation_id.as_deref().unwrap();
//! assert_eq!(naming::pascal_case(id), "ListPets");
//! assert_eq!(naming::snake_case(id), "list_pets");
//! ```

pub mod auth;
pub mod error;
pub mod naming;
pub mod openapi;
pub mod operation;
pub mod prelude;
pub mod refs;
pub mod request;
pub mod response;
pub mod types;

// Re-export main types at crate root
pub use auth::{AUTHORIZATION_HEADER, SecurityScheme};
pub use error::DocumentError;
pub use openapi::OpenApiDocument;
pub use operation::{HttpMethod, OperationDescriptor, ParamDescriptor, ParamLocation, SpecMetadata};
pub use refs::RefTable;
pub use request::{MediaType, RequestBody};
pub use response::{ResponseBody, ResponseStatus, ResponseVariant};
pub use types::{Primitive, TypeDescriptor, TypePropertyDescriptor};
