//! Server contract generation.
//!
//! One trait per target, `<Prefix>Spec`, with one async method per
//! operation. Implementations return a response variant or a
//! [`ServiceError`](bindery::ServiceError); they never see HTTP types.

use bindery_define::{OperationDescriptor, SpecMetadata, TypeDescriptor};
use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};

use super::types::{Scope, TypeMapper, doc_attrs, field_ident, primitive_type};
use crate::errors::GeneratorError;
use crate::output::SourceFile;

pub const SERVER_MODULE: &str = "server";

/// Name of the contract trait.
pub fn spec_trait_name(metadata: &SpecMetadata) -> Ident {
    format_ident!("{}Spec", metadata.name_prefix)
}

/// One argument of a contract method.
pub struct ContractParam {
    /// Wire name, or `None` for the request body.
    pub wire: Option<String>,
    pub ident: Ident,
    pub ty: TokenStream,
}

/// Arguments of an operation in contract order: declared parameters, then
/// the request body.
pub fn contract_params(
    operation: &OperationDescriptor,
    mapper: &TypeMapper<'_>,
) -> Result<Vec<ContractParam>, GeneratorError> {
    let mut params = Vec::with_capacity(operation.params.len() + 1);
    for param in &operation.params {
        let TypeDescriptor::Primitive(primitive) = &param.property.ty else {
            return Err(GeneratorError::CodeGenError(format!(
                "parameter '{}' of '{}' is not a scalar",
                param.name, operation.operation_id
            )));
        };
        let ty = primitive_type(*primitive);
        let ident = field_ident(&param.name);
        if params.iter().any(|p: &ContractParam| p.ident == ident) {
            return Err(GeneratorError::CodeGenError(format!(
                "parameters of '{}' collide on the name '{}'",
                operation.operation_id, ident
            )));
        }
        params.push(ContractParam {
            wire: Some(param.name.clone()),
            ident,
            ty: if param.required() {
                ty
            } else {
                quote! { Option<#ty> }
            },
        });
    }

    if let Some(body) = &operation.request_body {
        let ty = mapper.model_path(&body.class_name);
        params.push(ContractParam {
            wire: None,
            ident: format_ident!("request_body"),
            ty: if body.required {
                ty
            } else {
                quote! { Option<#ty> }
            },
        });
    }
    Ok(params)
}

/// Generates `server.rs`.
pub fn emit_server_interface(metadata: &SpecMetadata) -> Result<SourceFile, GeneratorError> {
    super::check_names(metadata)?;
    let mapper = TypeMapper::new(&metadata.refs, Scope::Sibling);
    let trait_name = spec_trait_name(metadata);

    let methods = metadata
        .operations
        .iter()
        .map(|operation| {
            let method = field_ident(&operation.operation_id);
            let response = mapper.model_path(&operation.response_body.class_name);
            let args = contract_params(operation, &mapper)?
                .into_iter()
                .map(|ContractParam { ident, ty, .. }| quote! { #ident: #ty });
            let doc = doc_attrs(&format!(
                "{}\n\n`{} {}`",
                operation.summary.as_deref().unwrap_or(&operation.operation_id),
                operation.method.to_string().to_uppercase(),
                operation.path,
            ));
            Ok(quote! {
                #doc
                fn #method(&self, #(#args),*) -> impl ::std::future::Future<
                    Output = Result<#response, ::bindery::ServiceError>,
                > + Send;
            })
        })
        .collect::<Result<Vec<_>, GeneratorError>>()?;

    let imports = (!metadata.operations.is_empty()).then(|| quote! { use super::models; });
    let trait_doc = doc_attrs(&format!(
        "Operations of the `{}` API.\n\nImplement this trait and serve it with `{}Controller`.",
        metadata.name_prefix, metadata.name_prefix
    ));

    let tokens = quote! {
        #imports

        #trait_doc
        pub trait #trait_name: Send + Sync + 'static {
            #(#methods)*
        }
    };

    Ok(SourceFile::new(vec![SERVER_MODULE.to_string()], tokens)
        .with_doc("The contract a server implementation fulfils."))
}
