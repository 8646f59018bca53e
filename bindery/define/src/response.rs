//! Response descriptors: per-status variants of an operation's result.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::types::TypeDescriptor;

/// The status key of a response entry.
///
/// ## Examples
///
/// ```
/// use bindery_define::ResponseStatus;
///
/// assert_eq!("200".parse::<ResponseStatus>().unwrap(), ResponseStatus::Code(200));
/// assert_eq!("default".parse::<ResponseStatus>().unwrap(), ResponseStatus::Default);
/// assert!("2XX".parse::<ResponseStatus>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResponseStatus {
    /// A fixed HTTP status code.
    Code(u16),
    /// The catch-all entry; the status is taken from the body's `code` field.
    Default,
}

impl FromStr for ResponseStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "default" {
            return Ok(Self::Default);
        }
        s.parse::<u16>()
            .map(Self::Code)
            .map_err(|_| format!("unsupported response status '{}'", s))
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "{}", code),
            Self::Default => f.write_str("default"),
        }
    }
}

/// One alternative of an operation's response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ResponseVariant {
    /// A status without a body.
    JustStatus {
        /// Variant name.
        name: String,
        /// Declared response headers, as a named object.
        headers: Option<TypeDescriptor>,
    },

    /// A status carrying a body.
    Parametrized {
        /// Variant name.
        name: String,
        /// Declared response headers, as a named object.
        headers: Option<TypeDescriptor>,
        /// Body type.
        body: TypeDescriptor,
        /// Whether the body is a binary file rather than JSON.
        is_file: bool,
    },
}

impl ResponseVariant {
    /// Variant name in the generated sum type.
    pub fn name(&self) -> &str {
        match self {
            Self::JustStatus { name, .. } | Self::Parametrized { name, .. } => name,
        }
    }

    /// Declared headers object, if any.
    pub fn headers(&self) -> Option<&TypeDescriptor> {
        match self {
            Self::JustStatus { headers, .. } | Self::Parametrized { headers, .. } => {
                headers.as_ref()
            }
        }
    }

    /// Body type, if any.
    pub fn body(&self) -> Option<&TypeDescriptor> {
        match self {
            Self::JustStatus { .. } => None,
            Self::Parametrized { body, .. } => Some(body),
        }
    }

    /// Returns `true` if the body is streamed from a file.
    pub fn is_file(&self) -> bool {
        matches!(self, Self::Parametrized { is_file: true, .. })
    }

    /// Members carried by the variant: body first, then headers.
    pub fn members(&self) -> Vec<TypeDescriptor> {
        self.body()
            .into_iter()
            .chain(self.headers())
            .cloned()
            .collect()
    }
}

/// A resolved set of responses for one operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseBody {
    /// Name of the generated sum type, `<OperationId>Response`.
    pub class_name: String,
    /// Variants keyed by status, in document order.
    pub variants: IndexMap<ResponseStatus, ResponseVariant>,
}

impl ResponseBody {
    /// Combined view: one sum type variant per status.
    pub fn one_of(&self) -> TypeDescriptor {
        TypeDescriptor::OneOf {
            name: self.class_name.clone(),
            variants: self
                .variants
                .values()
                .map(|v| (v.name().to_string(), v.members()))
                .collect(),
        }
    }

    /// The catch-all variant, if declared.
    pub fn default_variant(&self) -> Option<&ResponseVariant> {
        self.variants.get(&ResponseStatus::Default)
    }
}
