//! Code generation for bindery targets.
//!
//! Each emitter turns [`SpecMetadata`](bindery_define::SpecMetadata) into
//! one or more [`SourceFile`](crate::output::SourceFile)s:
//!
//! - [`server`] - the `<Prefix>Spec` contract trait
//! - [`models`] - one record or sum type per named type
//! - [`routes`] - the axum `<Prefix>Controller` and its handlers
//! - [`client`] - the reqwest `<Prefix>Client`
//!
//! Emitters return `proc_macro2::TokenStream`s, which are validated with
//! `syn` and formatted with `prettyplease` by [`crate::output`]. Generated
//! code refers to everything by absolute path (`::bindery`, `::serde`,
//! `::axum`) so that it can be written as a module tree or included as a
//! single file.

pub mod client;
pub mod models;
pub mod routes;
pub mod server;
pub mod types;

use bindery_define::naming::is_type_ident;
use bindery_define::{SpecMetadata, TypeDescriptor, TypePropertyDescriptor};
use proc_macro2::TokenStream;

pub use client::emit_client;
pub use models::ModelEmitter;
pub use routes::emit_routes;
pub use server::emit_server_interface;
pub use types::{Scope, TypeMapper};

use crate::errors::GeneratorError;

/// The record behind a form body: its type path and properties.
pub(crate) fn form_record<'t>(
    mapper: &'t TypeMapper<'_>,
    ty: &'t TypeDescriptor,
) -> Result<(TokenStream, &'t [TypePropertyDescriptor]), GeneratorError> {
    match mapper.resolve(ty)? {
        TypeDescriptor::Object {
            name: Some(name),
            properties,
        } if !properties.is_empty() => Ok((mapper.model_path(name), properties.as_slice())),
        other => Err(GeneratorError::CodeGenError(format!(
            "form bodies must be objects with properties, found {:?}",
            other
        ))),
    }
}

/// Fails if the prefix or any type or variant name in `metadata` cannot be
/// used as a Rust identifier. Every emitter runs this before it builds idents.
pub(crate) fn check_names(metadata: &SpecMetadata) -> Result<(), GeneratorError> {
    check_name(&metadata.name_prefix, "name prefix")?;
    for (_, ty) in metadata.refs.iter() {
        check_type_names(ty)?;
    }
    for operation in &metadata.operations {
        check_type_names(&operation.response_body.one_of())?;
        if let Some(body) = &operation.request_body {
            check_type_names(&body.one_of())?;
        }
    }
    Ok(())
}

fn check_type_names(ty: &TypeDescriptor) -> Result<(), GeneratorError> {
    match ty {
        TypeDescriptor::Primitive(_)
        | TypeDescriptor::File
        | TypeDescriptor::FileUpload
        | TypeDescriptor::RefType { .. } => Ok(()),
        TypeDescriptor::Array { name, element } => {
            if let Some(name) = name {
                check_name(name, "type")?;
            }
            check_type_names(element)
        }
        TypeDescriptor::Object { name, properties } => {
            if let Some(name) = name {
                check_name(name, "type")?;
            }
            properties.iter().try_for_each(|p| check_type_names(&p.ty))
        }
        TypeDescriptor::OneOf { name, variants } => {
            check_name(name, "type")?;
            for (tag, members) in variants {
                check_name(tag, "variant")?;
                members.iter().try_for_each(check_type_names)?;
            }
            Ok(())
        }
    }
}

fn check_name(name: &str, kind: &str) -> Result<(), GeneratorError> {
    if is_type_ident(name) {
        Ok(())
    } else {
        Err(GeneratorError::CodeGenError(format!(
            "{} name '{}' is not a valid Rust identifier",
            kind, name
        )))
    }
}
