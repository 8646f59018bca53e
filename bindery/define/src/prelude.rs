//! Convenient re-exports for working with bindery descriptors.
//!
//! ```
//! use bindery_define::prelude::*;
//!
//! let ty = TypeDescriptor::Primitive(Primitive::Int);
//! assert_eq!(ty.primitive(), Some(Primitive::Int));
//! ```

pub use crate::auth::SecurityScheme;
pub use crate::naming::{decapitalize, field_ident, pascal_case, simple_name, snake_case};
pub use crate::openapi::OpenApiDocument;
pub use crate::operation::{
    HttpMethod, OperationDescriptor, ParamDescriptor, ParamLocation, SpecMetadata,
};
pub use crate::refs::RefTable;
pub use crate::request::{MediaType, RequestBody};
pub use crate::response::{ResponseBody, ResponseStatus, ResponseVariant};
pub use crate::types::{Primitive, TypeDescriptor, TypePropertyDescriptor};
