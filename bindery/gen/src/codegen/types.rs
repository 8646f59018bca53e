//! Mapping from type descriptors to Rust types.

use bindery_define::naming::{self, simple_name};
use bindery_define::{Primitive, RefTable, TypeDescriptor, TypePropertyDescriptor};
use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};

use crate::errors::GeneratorError;

/// Where the generated code lives relative to the `models` module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Inside a file under `models/`: other models are `super::Name`.
    Models,
    /// In a sibling of `models` that has `use super::models;`.
    Sibling,
}

/// Renders descriptors as Rust types for one scope.
#[derive(Debug, Clone, Copy)]
pub struct TypeMapper<'a> {
    refs: &'a RefTable,
    scope: Scope,
}

impl<'a> TypeMapper<'a> {
    pub fn new(refs: &'a RefTable, scope: Scope) -> Self {
        Self { refs, scope }
    }

    /// Path to a generated model type.
    pub fn model_path(&self, name: &str) -> TokenStream {
        let ident = type_ident(name);
        match self.scope {
            Scope::Models => quote! { super::#ident },
            Scope::Sibling => quote! { models::#ident },
        }
    }

    /// Follows reference placeholders to their target.
    pub fn resolve<'t>(&'t self, ty: &'t TypeDescriptor) -> Result<&'t TypeDescriptor, GeneratorError> {
        self.refs.resolve(ty).ok_or_else(|| {
            GeneratorError::CodeGenError(format!("unresolvable type reference {:?}", ty))
        })
    }

    /// The Rust type of a value.
    ///
    /// ## Examples
    ///
    /// ```
    /// use bindery_define::{Primitive, RefTable, TypeDescriptor};
    /// use bindery_gen::codegen::types::{Scope, TypeMapper};
    ///
    /// let refs = RefTable::default();
    /// let mapper = TypeMapper::new(&refs, Scope::Sibling);
    /// let ty = TypeDescriptor::Array {
    ///     name: None,
    ///     element: Box::new(TypeDescriptor::Primitive(Primitive::Int64)),
    /// };
    /// assert_eq!(mapper.rust_type(&ty).unwrap().to_string(), "Vec < i64 >");
    /// ```
    pub fn rust_type(&self, ty: &TypeDescriptor) -> Result<TokenStream, GeneratorError> {
        Ok(match ty {
            TypeDescriptor::Primitive(p) => primitive_type(*p),
            TypeDescriptor::FileUpload => self.model_path("FileUpload"),
            TypeDescriptor::File => quote! { ::std::path::PathBuf },
            TypeDescriptor::Array {
                name: Some(name), ..
            }
            | TypeDescriptor::Object {
                name: Some(name), ..
            }
            | TypeDescriptor::OneOf { name, .. } => self.model_path(name),
            TypeDescriptor::Array {
                name: None,
                element,
            } => {
                let element = self.rust_type(element)?;
                quote! { Vec<#element> }
            }
            TypeDescriptor::Object {
                name: None,
                properties,
            } if properties.is_empty() => {
                quote! { ::std::collections::HashMap<String, ::serde_json::Value> }
            }
            TypeDescriptor::Object { name: None, .. } => {
                return Err(GeneratorError::CodeGenError(
                    "inline object with properties has no type name".to_string(),
                ));
            }
            TypeDescriptor::RefType { .. } => return self.rust_type(self.resolve(ty)?),
        })
    }

    /// The type of a struct field: boxed when it closes a reference cycle,
    /// optional when the property is not required.
    pub fn property_type(&self, prop: &TypePropertyDescriptor) -> Result<TokenStream, GeneratorError> {
        let mut rust = self.rust_type(&prop.ty)?;
        let recursive = matches!(
            &prop.ty,
            TypeDescriptor::RefType { pointer } if self.refs.is_recursive(pointer)
        );
        if recursive {
            rust = quote! { Box<#rust> };
        }
        if !prop.required {
            rust = quote! { Option<#rust> };
        }
        Ok(rust)
    }
}

pub fn primitive_type(primitive: Primitive) -> TokenStream {
    match primitive {
        Primitive::Int => quote! { i32 },
        Primitive::Int64 => quote! { i64 },
        Primitive::Float => quote! { f64 },
        Primitive::String => quote! { String },
        Primitive::Boolean => quote! { bool },
    }
}

/// The runtime parser for a primitive parameter.
pub fn parser_fn(primitive: Primitive) -> TokenStream {
    match primitive {
        Primitive::Int => quote! { ::bindery::parse_int },
        Primitive::Int64 => quote! { ::bindery::parse_long },
        Primitive::Float => quote! { ::bindery::parse_float },
        Primitive::String => quote! { ::bindery::parse_string },
        Primitive::Boolean => quote! { ::bindery::parse_bool_strict },
    }
}

/// The ident of a generated type or variant. `name` must have passed
/// [`check_names`](super::check_names).
pub fn type_ident(name: &str) -> Ident {
    format_ident!("{}", name)
}

/// A field or binding name for an arbitrary wire name.
pub fn field_ident(name: &str) -> Ident {
    format_ident!("{}", naming::field_ident(name))
}

/// The name a variant member is known by.
pub fn member_name(ty: &TypeDescriptor) -> &str {
    match ty {
        TypeDescriptor::RefType { pointer } => simple_name(pointer),
        TypeDescriptor::File | TypeDescriptor::FileUpload => "file",
        other => other.name().unwrap_or("body"),
    }
}

pub fn member_ident(ty: &TypeDescriptor) -> Ident {
    field_ident(member_name(ty))
}

/// One `#[doc]` attribute per line of `text`.
pub fn doc_attrs(text: &str) -> TokenStream {
    let lines = text.lines().map(|line| {
        let line = if line.is_empty() {
            String::new()
        } else {
            format!(" {}", line)
        };
        quote! { #[doc = #line] }
    });
    quote! { #(#lines)* }
}
