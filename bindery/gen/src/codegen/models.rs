//! Data-model generation.
//!
//! Every named type reachable from the reference table or from an
//! operation's request and response sum types gets one file under
//! `models/`. Names are generated once per run: the first descriptor to
//! claim a name wins.

use bindery_define::naming::decapitalize;
use bindery_define::{SpecMetadata, TypeDescriptor, TypePropertyDescriptor};
use indexmap::IndexMap;
use proc_macro2::TokenStream;
use quote::quote;

use super::types::{Scope, TypeMapper, doc_attrs, field_ident, member_ident, type_ident};
use crate::errors::GeneratorError;
use crate::output::SourceFile;

/// Module the models are generated into.
pub const MODELS_MODULE: &str = "models";

/// Name of the always-present multipart upload record.
pub const FILE_UPLOAD: &str = "FileUpload";

struct Model {
    descriptor: Option<TypeDescriptor>,
    tokens: TokenStream,
}

/// Emits one source file per named type.
pub struct ModelEmitter<'a> {
    metadata: &'a SpecMetadata,
    mapper: TypeMapper<'a>,
    generated: IndexMap<String, Model>,
}

impl<'a> ModelEmitter<'a> {
    pub fn new(metadata: &'a SpecMetadata) -> Self {
        Self {
            metadata,
            mapper: TypeMapper::new(&metadata.refs, Scope::Models),
            generated: IndexMap::new(),
        }
    }

    /// Generates `models/mod.rs` and one file per type.
    pub fn emit(mut self) -> Result<Vec<SourceFile>, GeneratorError> {
        super::check_names(self.metadata)?;
        self.generated.insert(
            FILE_UPLOAD.to_string(),
            Model {
                descriptor: None,
                tokens: file_upload(),
            },
        );

        let metadata = self.metadata;
        for (_, ty) in metadata.refs.iter() {
            self.visit(ty)?;
        }
        for operation in &metadata.operations {
            self.visit(&operation.response_body.one_of())?;
            if let Some(body) = &operation.request_body {
                self.visit(&body.one_of())?;
            }
        }

        let mut files = Vec::with_capacity(self.generated.len() + 1);
        let mut exports = Vec::with_capacity(self.generated.len());
        for (name, model) in self.generated {
            let module = field_ident(&name);
            let ident = type_ident(&name);
            exports.push(quote! { pub use self::#module::#ident; });
            files.push(SourceFile::new(
                vec![MODELS_MODULE.to_string(), module.to_string()],
                model.tokens,
            ));
        }
        tracing::debug!(models = files.len(), "generated models");

        files.insert(
            0,
            SourceFile::new(vec![MODELS_MODULE.to_string()], quote! { #(#exports)* })
                .with_doc("Data types exchanged by the operations."),
        );
        Ok(files)
    }

    fn visit(&mut self, ty: &TypeDescriptor) -> Result<(), GeneratorError> {
        match ty {
            TypeDescriptor::Primitive(_)
            | TypeDescriptor::File
            | TypeDescriptor::FileUpload
            | TypeDescriptor::RefType { .. } => Ok(()),
            TypeDescriptor::Array { name, element } => {
                if let Some(name) = name
                    && self.claim(name, ty)
                {
                    let tokens = self.array_wrapper(name, element)?;
                    self.store(name, ty, tokens);
                }
                self.visit(element)
            }
            TypeDescriptor::Object { name, properties } => {
                if let Some(name) = name
                    && self.claim(name, ty)
                {
                    let tokens = self.record(name, properties)?;
                    self.store(name, ty, tokens);
                }
                properties.iter().try_for_each(|p| self.visit(&p.ty))
            }
            TypeDescriptor::OneOf { name, variants } => {
                if self.claim(name, ty) {
                    let tokens = self.sum(name, variants)?;
                    self.store(name, ty, tokens);
                }
                variants.values().flatten().try_for_each(|m| self.visit(m))
            }
        }
    }

    /// Returns `true` if `name` has not been generated yet.
    fn claim(&self, name: &str, ty: &TypeDescriptor) -> bool {
        match self.generated.get(name) {
            None => true,
            Some(existing) => {
                if existing.descriptor.as_ref() != Some(ty) {
                    tracing::warn!(name, "type name already generated for a different schema");
                }
                false
            }
        }
    }

    fn store(&mut self, name: &str, ty: &TypeDescriptor, tokens: TokenStream) {
        self.generated.insert(
            name.to_string(),
            Model {
                descriptor: Some(ty.clone()),
                tokens,
            },
        );
    }

    fn record(
        &self,
        name: &str,
        properties: &[TypePropertyDescriptor],
    ) -> Result<TokenStream, GeneratorError> {
        let ident = type_ident(name);

        if properties.is_empty() {
            return Ok(quote! {
                #[derive(Debug, Clone, Default, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
                pub struct #ident {
                    #[serde(flatten)]
                    pub additional_properties: ::std::collections::HashMap<String, ::serde_json::Value>,
                }
            });
        }

        let fields = properties
            .iter()
            .map(|prop| {
                let field = field_ident(&prop.name);
                let wire = &prop.name;
                let ty = self.mapper.property_type(prop)?;
                let serde = if prop.required {
                    quote! { #[serde(rename = #wire)] }
                } else {
                    quote! { #[serde(rename = #wire, default, skip_serializing_if = "Option::is_none")] }
                };
                let doc = prop
                    .format
                    .as_ref()
                    .map(|format| doc_attrs(&format!("Format: `{}`", format)));
                Ok(quote! {
                    #doc
                    #serde
                    pub #field: #ty,
                })
            })
            .collect::<Result<Vec<_>, GeneratorError>>()?;

        Ok(quote! {
            #[derive(Debug, Clone, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
            pub struct #ident {
                #(#fields)*
            }
        })
    }

    /// A named array is a record with one field named after the type.
    fn array_wrapper(&self, name: &str, element: &TypeDescriptor) -> Result<TokenStream, GeneratorError> {
        let wire = decapitalize(name);
        let prop = TypePropertyDescriptor::new(
            wire,
            TypeDescriptor::Array {
                name: None,
                element: Box::new(element.clone()),
            },
            true,
        );
        self.record(name, &[prop])
    }

    fn sum(
        &self,
        name: &str,
        variants: &IndexMap<String, Vec<TypeDescriptor>>,
    ) -> Result<TokenStream, GeneratorError> {
        let ident = type_ident(name);
        let variants = variants
            .iter()
            .map(|(tag, members)| {
                let tag = type_ident(tag);
                if members.is_empty() {
                    return Ok(quote! { #tag, });
                }
                let fields = members
                    .iter()
                    .map(|member| {
                        let field = member_ident(member);
                        let ty = self.mapper.rust_type(member)?;
                        Ok(quote! { #field: #ty, })
                    })
                    .collect::<Result<Vec<_>, GeneratorError>>()?;
                Ok(quote! { #tag { #(#fields)* }, })
            })
            .collect::<Result<Vec<_>, GeneratorError>>()?;

        Ok(quote! {
            #[derive(Debug, Clone, PartialEq)]
            pub enum #ident {
                #(#variants)*
            }
        })
    }
}

fn file_upload() -> TokenStream {
    let ident = type_ident(FILE_UPLOAD);
    quote! {
        /// A file received as one part of a multipart request.
        ///
        /// `file` is deleted once the request that produced it completes.
        #[derive(Debug, Clone, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        pub struct #ident {
            pub name: String,
            pub file: ::std::path::PathBuf,
            pub content_type: String,
        }

        impl From<::bindery::UploadedFile> for #ident {
            fn from(upload: ::bindery::UploadedFile) -> Self {
                Self {
                    name: upload.name,
                    file: upload.path,
                    content_type: upload.content_type,
                }
            }
        }
    }
}
