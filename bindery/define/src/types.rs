//! Type descriptors: the intermediate representation shared by every emitter.
//!
//! - [`TypeDescriptor`] - the shape of a value on the wire
//! - [`Primitive`] - scalar leaf types
//! - [`TypePropertyDescriptor`] - a named, optionally required member of an object

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Scalar wire types.
///
/// ## Examples
///
/// ```
/// use std::str::FromStr;
/// use bindery_define::Primitive;
///
/// assert_eq!(Primitive::Int64.to_string(), "int64");
/// assert_eq!(Primitive::from_str("boolean").unwrap(), Primitive::Boolean);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Primitive {
    /// 32-bit signed integer (`integer`)
    Int,
    /// 64-bit signed integer (`integer` with format `int64`)
    Int64,
    /// Floating point number (`number`)
    Float,
    /// UTF-8 string
    String,
    /// `true` / `false`
    Boolean,
}

/// The shape of a value, as resolved from the schema graph.
///
/// References to named schemas stay as [`TypeDescriptor::RefType`]
/// placeholders; their targets live in the [`crate::RefTable`]. This keeps
/// recursive and shared types finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeDescriptor {
    /// A scalar value.
    Primitive(Primitive),

    /// A file received in a multipart request.
    FileUpload,

    /// A binary payload sent back in a response, backed by a file on disk.
    File,

    /// A homogeneous list. Named arrays become wrapper records.
    Array {
        /// Type name when the array is a named schema.
        name: Option<String>,
        /// Element type.
        element: Box<TypeDescriptor>,
    },

    /// A record. An object with no properties is an open string-keyed map.
    Object {
        /// Type name; inline maps have none.
        name: Option<String>,
        /// Declared properties in document order.
        properties: Vec<TypePropertyDescriptor>,
    },

    /// A closed sum type: tag to the members carried by that variant.
    OneOf {
        /// Type name of the sum.
        name: String,
        /// Variants in declaration order. An empty member list is a unit variant.
        variants: IndexMap<String, Vec<TypeDescriptor>>,
    },

    /// A placeholder pointing into the reference table.
    RefType {
        /// The `$ref` pointer, e.g. `#/components/schemas/Pet`.
        pointer: String,
    },
}

impl TypeDescriptor {
    /// Shorthand for a reference placeholder.
    pub fn reference(pointer: impl Into<String>) -> Self {
        Self::RefType {
            pointer: pointer.into(),
        }
    }

    /// Returns the declared type name, if the descriptor has one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Array { name, .. } | Self::Object { name, .. } => name.as_deref(),
            Self::OneOf { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Returns `true` for an object without properties (a dynamic map).
    pub fn is_dynamic_map(&self) -> bool {
        matches!(self, Self::Object { properties, .. } if properties.is_empty())
    }

    /// Returns `true` for a multipart file upload.
    pub fn is_file_upload(&self) -> bool {
        matches!(self, Self::FileUpload)
    }

    /// Returns the primitive kind, if this is a scalar.
    pub fn primitive(&self) -> Option<Primitive> {
        match self {
            Self::Primitive(p) => Some(*p),
            _ => None,
        }
    }
}

/// A named member of an object or a parameter's value type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypePropertyDescriptor {
    /// Wire name of the property.
    pub name: String,
    /// Value type.
    pub ty: TypeDescriptor,
    /// Optional `format` hint from the schema.
    pub format: Option<String>,
    /// Whether the property must be present.
    pub required: bool,
}

impl TypePropertyDescriptor {
    /// Creates a property descriptor without a format hint.
    pub fn new(name: impl Into<String>, ty: TypeDescriptor, required: bool) -> Self {
        Self {
            name: name.into(),
            ty,
            format: None,
            required,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_of_named_descriptors() {
        let obj = TypeDescriptor::Object {
            name: Some("Pet".into()),
            properties: vec![],
        };
        assert_eq!(obj.name(), Some("Pet"));

        let one_of = TypeDescriptor::OneOf {
            name: "ListPetsResponse".into(),
            variants: IndexMap::new(),
        };
        assert_eq!(one_of.name(), Some("ListPetsResponse"));

        assert_eq!(TypeDescriptor::Primitive(Primitive::Int).name(), None);
        assert_eq!(TypeDescriptor::reference("#/components/schemas/Pet").name(), None);
    }

    #[test]
    fn empty_object_is_dynamic_map() {
        let map = TypeDescriptor::Object {
            name: None,
            properties: vec![],
        };
        assert!(map.is_dynamic_map());

        let record = TypeDescriptor::Object {
            name: Some("Pet".into()),
            properties: vec![TypePropertyDescriptor::new(
                "id",
                TypeDescriptor::Primitive(Primitive::Int64),
                true,
            )],
        };
        assert!(!record.is_dynamic_map());
    }

    #[test]
    fn primitive_display_is_lowercase() {
        assert_eq!(Primitive::Float.to_string(), "float");
        assert_eq!(Primitive::String.to_string(), "string");
    }
}
