//! axum binding generation.
//!
//! Produces `<Prefix>Controller`, which turns a contract implementation
//! into an [`axum::Router`]. Each operation gets one handler that:
//!
//! 1. owns a [`CleanupRegistry`](bindery::CleanupRegistry) for the request
//! 2. reads parameters from the path, the query string and the headers
//! 3. decodes the body according to its content type
//! 4. calls the contract
//! 5. writes the returned variant as status, headers and body
//!
//! Request errors short-circuit with a `400` and a structured body; contract
//! errors become a `500`.

use bindery_define::{
    MediaType, OperationDescriptor, ParamDescriptor, ParamLocation, ResponseStatus, ResponseVariant,
    SpecMetadata, TypeDescriptor,
};
use proc_macro2::{Ident, Literal, TokenStream};
use quote::{format_ident, quote};

use super::form_record;
use super::server::{ContractParam, contract_params, spec_trait_name};
use super::types::{Scope, TypeMapper, doc_attrs, field_ident, member_ident, parser_fn, type_ident};
use crate::errors::GeneratorError;
use crate::output::SourceFile;

pub const ROUTES_MODULE: &str = "routes";

/// Handler locals a parameter must not shadow.
const RESERVED: &[&str] = &[
    "server",
    "path_params",
    "query_params",
    "header_map",
    "request",
    "request_body",
    "cleanup",
    "response",
    "writer",
];

pub fn controller_name(metadata: &SpecMetadata) -> Ident {
    format_ident!("{}Controller", metadata.name_prefix)
}

/// Local binding for a parameter inside a handler.
fn local_ident(ident: &Ident) -> Ident {
    if RESERVED.iter().any(|r| ident == r) {
        format_ident!("{}_param", ident)
    } else {
        ident.clone()
    }
}

/// Generates `routes.rs`.
pub fn emit_routes(metadata: &SpecMetadata) -> Result<SourceFile, GeneratorError> {
    super::check_names(metadata)?;
    let mapper = TypeMapper::new(&metadata.refs, Scope::Sibling);
    let spec = spec_trait_name(metadata);
    let controller = controller_name(metadata);

    let handlers = metadata
        .operations
        .iter()
        .map(|operation| Handler::new(operation, &mapper, &spec).emit())
        .collect::<Result<Vec<_>, GeneratorError>>()?;

    // Operations sharing a path share one method router.
    let mut paths: Vec<(&str, Vec<TokenStream>)> = Vec::new();
    for operation in &metadata.operations {
        let handler = field_ident(&operation.operation_id);
        let method = format_ident!("{}", operation.method.to_string());
        let route = quote! { #method(#handler::<S>) };
        match paths.iter_mut().find(|(path, _)| *path == operation.path) {
            Some((_, routes)) => routes.push(route),
            None => paths.push((&operation.path, vec![route])),
        }
    }
    let routes = paths.iter().filter_map(|(path, routes)| {
        let (first, rest) = routes.split_first()?;
        Some(quote! {
            .route(#path, ::axum::routing::#first #(.#rest)*)
        })
    });

    let imports = (!metadata.operations.is_empty()).then(|| {
        quote! {
            use super::models;
        }
    });

    let controller_doc = doc_attrs(&format!(
        "Serves a `{}` implementation over HTTP.\n\n\
         ```ignore\n\
         let router = {}::new(MyServer).into_router();\n\
         axum::serve(listener, router).await?;\n\
         ```",
        spec, controller
    ));

    let tokens = quote! {
        #imports
        use super::server::#spec;

        #controller_doc
        pub struct #controller<S> {
            server: ::std::sync::Arc<S>,
        }

        impl<S> Clone for #controller<S> {
            fn clone(&self) -> Self {
                Self {
                    server: ::std::sync::Arc::clone(&self.server),
                }
            }
        }

        impl<S: #spec> #controller<S> {
            pub fn new(server: S) -> Self {
                Self::from_arc(::std::sync::Arc::new(server))
            }

            /// Shares an implementation that is also used elsewhere.
            pub fn from_arc(server: ::std::sync::Arc<S>) -> Self {
                Self { server }
            }

            /// A router with one route per operation.
            pub fn into_router(self) -> ::axum::Router {
                ::axum::Router::new()
                    #(#routes)*
                    .with_state(self.server)
            }

            /// Adds every route to an existing router.
            pub fn bind(self, router: ::axum::Router) -> ::axum::Router {
                router.merge(self.into_router())
            }
        }

        #(#handlers)*
    };

    Ok(SourceFile::new(vec![ROUTES_MODULE.to_string()], tokens)
        .with_doc("HTTP bindings for the server contract."))
}

/// Code for one operation handler.
struct Handler<'m> {
    operation: &'m OperationDescriptor,
    mapper: &'m TypeMapper<'m>,
    spec: &'m Ident,
}

impl<'m> Handler<'m> {
    fn new(operation: &'m OperationDescriptor, mapper: &'m TypeMapper<'m>, spec: &'m Ident) -> Self {
        Self {
            operation,
            mapper,
            spec,
        }
    }

    fn emit(&self) -> Result<TokenStream, GeneratorError> {
        let operation = self.operation;
        let name = field_ident(&operation.operation_id);
        let spec = self.spec;

        let has_path = operation.params_in(ParamLocation::Path).next().is_some();
        let has_query = operation.params_in(ParamLocation::Query).next().is_some();
        let has_headers = operation.params_in(ParamLocation::Header).next().is_some()
            || operation.request_body.is_some();

        let mut extractors = vec![quote! {
            ::axum::extract::State(server): ::axum::extract::State<::std::sync::Arc<S>>
        }];
        if has_path {
            extractors.push(quote! {
                ::axum::extract::Path(path_params): ::axum::extract::Path<::std::collections::HashMap<String, String>>
            });
        }
        if has_query {
            extractors.push(quote! {
                ::axum::extract::Query(query_params): ::axum::extract::Query<::std::collections::HashMap<String, String>>
            });
        }
        if has_headers {
            extractors.push(quote! { header_map: ::axum::http::HeaderMap });
        }
        if operation.request_body.is_some() {
            extractors.push(quote! { request: ::axum::extract::Request });
        }

        let params = contract_params(operation, self.mapper)?;
        let reads = params
            .iter()
            .zip(&operation.params)
            .map(|(param, descriptor)| self.read_param(param, descriptor))
            .collect::<Result<Vec<_>, GeneratorError>>()?;
        let args = params.iter().map(|p| match p.wire {
            Some(_) => local_ident(&p.ident),
            None => format_ident!("request_body"),
        });

        let body = self.read_body()?;
        let dispatch = self.dispatch()?;

        let needs_cleanup = self.uploads_files()? || self.returns_files();
        let cleanup = if needs_cleanup {
            quote! { let mut cleanup = ::bindery::CleanupRegistry::new(); }
        } else {
            quote! { let _cleanup = ::bindery::CleanupRegistry::new(); }
        };

        let doc = format!("`{} {}`", operation.method.to_string().to_uppercase(), operation.path);

        Ok(quote! {
            #[doc = #doc]
            async fn #name<S: #spec>(
                #(#extractors),*
            ) -> Result<::axum::response::Response, ::bindery::HandlerError> {
                #cleanup
                #(#reads)*
                #body
                let response = server.#name(#(#args),*).await?;
                #dispatch
            }
        })
    }

    fn read_param(
        &self,
        param: &ContractParam,
        descriptor: &ParamDescriptor,
    ) -> Result<TokenStream, GeneratorError> {
        let wire = &descriptor.name;
        let local = local_ident(&param.ident);
        let primitive = descriptor.property.ty.primitive().ok_or_else(|| {
            GeneratorError::CodeGenError(format!("parameter '{}' is not a scalar", wire))
        })?;
        let parser = parser_fn(primitive);

        let raw = match descriptor.location {
            ParamLocation::Path => quote! { path_params.get(#wire).map(String::as_str) },
            ParamLocation::Query => quote! { query_params.get(#wire).map(String::as_str) },
            ParamLocation::Header => quote! { ::bindery::header_value(&header_map, #wire)? },
        };
        let read = if descriptor.required() {
            quote! { ::bindery::read_required_param }
        } else {
            quote! { ::bindery::read_optional_param }
        };
        Ok(quote! {
            let #local = #read(#wire, #raw, #parser)?;
        })
    }

    fn uploads_files(&self) -> Result<bool, GeneratorError> {
        let Some(body) = &self.operation.request_body else {
            return Ok(false);
        };
        let Some(ty) = body.content.get(&MediaType::MultipartForm) else {
            return Ok(false);
        };
        let (_, properties) = form_record(self.mapper, ty)?;
        Ok(properties.iter().any(|p| p.ty.is_file_upload()))
    }

    fn returns_files(&self) -> bool {
        self.operation
            .response_body
            .variants
            .values()
            .any(ResponseVariant::is_file)
    }

    /// `let request_body = match content type { ... };`
    fn read_body(&self) -> Result<TokenStream, GeneratorError> {
        let Some(body) = &self.operation.request_body else {
            return Ok(TokenStream::new());
        };
        let class = self.mapper.model_path(&body.class_name);

        let mut arms = Vec::with_capacity(body.content.len() + 2);
        for (media, ty) in &body.content {
            let mime = media.mime();
            let tag = type_ident(&media.to_string());
            let member = member_ident(ty);
            let decode = match media {
                MediaType::Json => quote! {
                    ::bindery::valid_body(async {
                        Ok::<_, ::bindery::BodyError>(#class::#tag {
                            #member: ::bindery::read_json(request).await?,
                        })
                    }.await)?
                },
                MediaType::Xml => quote! {
                    ::bindery::valid_body(::bindery::unsupported_media(#mime))?
                },
                MediaType::Form => {
                    let record = self.form_fields(ty, quote! { ::bindery::read_form(request).await? }, false)?;
                    quote! {
                        ::bindery::valid_body(async {
                            #record
                            Ok::<_, ::bindery::BodyError>(#class::#tag { #member: record })
                        }.await)?
                    }
                }
                MediaType::MultipartForm => {
                    let record = self.form_fields(ty, quote! { ::bindery::read_multipart(request).await? }, true)?;
                    quote! {
                        ::bindery::valid_body(async {
                            #record
                            Ok::<_, ::bindery::BodyError>(#class::#tag { #member: record })
                        }.await)?
                    }
                }
            };
            if body.required {
                arms.push(quote! { Some(#mime) => #decode, });
            } else {
                arms.push(quote! { Some(#mime) => Some(#decode), });
            }
        }
        if !body.required {
            arms.push(quote! { None => None, });
        }
        arms.push(quote! {
            _ => return Err(::bindery::RequestError::NoBodyFound.into()),
        });

        Ok(quote! {
            let request_body = match ::bindery::primary_content_type(&header_map).as_deref() {
                #(#arms)*
            };
        })
    }

    /// Statements reading a form record field by field into `record`. Text
    /// fields are read before any file is written.
    fn form_fields(
        &self,
        ty: &TypeDescriptor,
        source: TokenStream,
        multipart: bool,
    ) -> Result<TokenStream, GeneratorError> {
        let (path, properties) = form_record(self.mapper, ty)?;

        let mut texts = Vec::new();
        let mut files = Vec::new();
        let mut fields = Vec::new();
        for prop in properties {
            let field = field_ident(&prop.name);
            let local = format_ident!("field_{}", field);
            let wire = &prop.name;
            fields.push(quote! { #field: #local });

            if prop.ty.is_file_upload() {
                if !multipart {
                    return Err(GeneratorError::CodeGenError(format!(
                        "file field '{}' is only supported in multipart bodies",
                        wire
                    )));
                }
                files.push(if prop.required {
                    quote! {
                        let #local = models::FileUpload::from(form.required_file(#wire, &mut cleanup).await?);
                    }
                } else {
                    quote! {
                        let #local = form
                            .optional_file(#wire, &mut cleanup)
                            .await?
                            .map(models::FileUpload::from);
                    }
                });
                continue;
            }

            let primitive = self
                .mapper
                .resolve(&prop.ty)?
                .primitive()
                .ok_or_else(|| {
                    GeneratorError::CodeGenError(format!(
                        "form field '{}' must be a scalar or a file",
                        wire
                    ))
                })?;
            let parser = parser_fn(primitive);
            texts.push(if prop.required {
                quote! { let #local = form.required(#wire, #parser)?; }
            } else {
                quote! { let #local = form.optional(#wire, #parser)?; }
            });
        }

        Ok(quote! {
            let form = #source;
            #(#texts)*
            #(#files)*
            let record = #path { #(#fields),* };
        })
    }

    /// The `match response { ... }` writing each variant.
    fn dispatch(&self) -> Result<TokenStream, GeneratorError> {
        let response_body = &self.operation.response_body;
        let class = self.mapper.model_path(&response_body.class_name);

        let arms = response_body
            .variants
            .iter()
            .map(|(status, variant)| self.dispatch_arm(&class, *status, variant))
            .collect::<Result<Vec<_>, GeneratorError>>()?;

        Ok(quote! {
            match response {
                #(#arms)*
            }
        })
    }

    fn dispatch_arm(
        &self,
        class: &TokenStream,
        status: ResponseStatus,
        variant: &ResponseVariant,
    ) -> Result<TokenStream, GeneratorError> {
        let tag = type_ident(variant.name());
        let members = variant.members();
        let bindings: Vec<Ident> = members.iter().map(member_ident).collect();
        let pattern = if bindings.is_empty() {
            quote! { #class::#tag }
        } else {
            quote! { #class::#tag { #(#bindings),* } }
        };

        let code = match status {
            ResponseStatus::Code(code) => {
                let code = Literal::i64_unsuffixed(i64::from(code));
                quote! { #code }
            }
            ResponseStatus::Default => {
                let body = variant.body().map(member_ident).ok_or_else(|| {
                    GeneratorError::CodeGenError(format!(
                        "default response of '{}' has no body",
                        self.operation.operation_id
                    ))
                })?;
                quote! { i64::from(#body.code) }
            }
        };

        let headers = match variant.headers() {
            None => Vec::new(),
            Some(headers) => {
                let binding = member_ident(headers);
                let TypeDescriptor::Object { properties, .. } = headers else {
                    return Err(GeneratorError::CodeGenError(format!(
                        "headers of '{}' are not an object",
                        variant.name()
                    )));
                };
                properties
                    .iter()
                    .map(|prop| {
                        let field = field_ident(&prop.name);
                        let wire = &prop.name;
                        if prop.required {
                            quote! { writer.header(#wire, &#binding.#field)?; }
                        } else {
                            quote! {
                                if let Some(value) = &#binding.#field {
                                    writer.header(#wire, value)?;
                                }
                            }
                        }
                    })
                    .collect()
            }
        };
        let writer = if headers.is_empty() {
            quote! { let writer = ::bindery::ResponseWriter::from_code(#code)?; }
        } else {
            quote! { let mut writer = ::bindery::ResponseWriter::from_code(#code)?; }
        };

        let mut register = None;
        let write = match variant.body() {
            None => quote! { writer.empty() },
            Some(body) if variant.is_file() => {
                let binding = member_ident(body);
                register = Some(quote! { cleanup.remove_file(&#binding); });
                quote! { writer.file(&#binding).await }
            }
            Some(body) => {
                let binding = member_ident(body);
                quote! { writer.json(&#binding) }
            }
        };

        Ok(quote! {
            #pattern => {
                #register
                #writer
                #(#headers)*
                #write
            }
        })
    }
}
