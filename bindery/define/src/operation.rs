//! Operation descriptors and the resolved metadata of a whole document.
//!
//! - [`SpecMetadata`] - ordered operations plus the reference table
//! - [`OperationDescriptor`] - one path + method pair
//! - [`ParamDescriptor`] - one query, path or header parameter
//! - [`HttpMethod`] / [`ParamLocation`] - closed enumerations

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::refs::RefTable;
use crate::request::RequestBody;
use crate::response::ResponseBody;
use crate::types::TypePropertyDescriptor;

/// HTTP methods an operation can be bound to.
///
/// ## Examples
///
/// ```
/// use std::str::FromStr;
/// use bindery_define::HttpMethod;
///
/// assert_eq!(HttpMethod::from_str("get").unwrap(), HttpMethod::Get);
/// assert_eq!(HttpMethod::Delete.to_string(), "delete");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HttpMethod {
    /// HTTP GET
    Get,
    /// HTTP POST
    Post,
    /// HTTP PUT
    Put,
    /// HTTP PATCH
    Patch,
    /// HTTP DELETE
    Delete,
}

/// Where a parameter is read from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ParamLocation {
    /// `?name=value`
    Query,
    /// `/items/{name}`
    Path,
    /// `name: value`
    Header,
}

/// A parameter of an operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamDescriptor {
    /// Wire name.
    pub name: String,
    /// Source location.
    pub location: ParamLocation,
    /// Value type and required flag.
    pub property: TypePropertyDescriptor,
}

impl ParamDescriptor {
    /// Whether the parameter must be present.
    pub fn required(&self) -> bool {
        self.property.required
    }
}

/// One operation of the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationDescriptor {
    /// Path template, e.g. `/pets/{petId}`.
    pub path: String,
    /// HTTP method.
    pub method: HttpMethod,
    /// The document's `operationId`.
    pub operation_id: String,
    /// Optional one-line summary, carried into generated docs.
    pub summary: Option<String>,
    /// Parameters in contract order (security parameter first).
    pub params: Vec<ParamDescriptor>,
    /// Request body, if the operation accepts one.
    pub request_body: Option<RequestBody>,
    /// Response variants.
    pub response_body: ResponseBody,
}

impl OperationDescriptor {
    /// Parameters read from the given location.
    pub fn params_in(&self, location: ParamLocation) -> impl Iterator<Item = &ParamDescriptor> {
        self.params.iter().filter(move |p| p.location == location)
    }
}

/// Everything the emitters need: operations in document order and the
/// reference table for every named schema they reach.
#[derive(Debug, Clone, Default)]
pub struct SpecMetadata {
    /// Prefix for the contract, controller and client names.
    pub name_prefix: String,
    /// Operations in document order.
    pub operations: Vec<OperationDescriptor>,
    /// Resolved named schemas.
    pub refs: RefTable,
}
