//! HTTP client generation.
//!
//! `<Prefix>Client` mirrors the contract: one async method per operation
//! with the same parameters, returning the same response sum type. Statuses
//! the operation does not declare become
//! [`ClientError::UnexpectedStatus`](bindery::ClientError::UnexpectedStatus).

use bindery_define::{
    MediaType, OperationDescriptor, ParamLocation, ResponseStatus, ResponseVariant, SpecMetadata,
    TypeDescriptor,
};
use proc_macro2::{Ident, Literal, TokenStream};
use quote::{format_ident, quote};

use super::form_record;
use super::server::contract_params;
use super::types::{Scope, TypeMapper, doc_attrs, field_ident, member_ident, parser_fn, type_ident};
use crate::errors::GeneratorError;
use crate::output::SourceFile;

pub const CLIENT_MODULE: &str = "client";

pub fn client_name(metadata: &SpecMetadata) -> Ident {
    format_ident!("{}Client", metadata.name_prefix)
}

/// Generates `client.rs`.
pub fn emit_client(metadata: &SpecMetadata) -> Result<SourceFile, GeneratorError> {
    super::check_names(metadata)?;
    let mapper = TypeMapper::new(&metadata.refs, Scope::Sibling);
    let client = client_name(metadata);

    let methods = metadata
        .operations
        .iter()
        .map(|operation| client_method(operation, &mapper))
        .collect::<Result<Vec<_>, GeneratorError>>()?;

    let imports = (!metadata.operations.is_empty()).then(|| quote! { use super::models; });
    let doc = doc_attrs(&format!(
        "HTTP client for the `{}` API.\n\nRedirects are returned as responses, not followed.",
        metadata.name_prefix
    ));

    let tokens = quote! {
        #imports

        #doc
        #[derive(Debug, Clone)]
        pub struct #client {
            client: ::reqwest::Client,
            base_url: String,
        }

        impl #client {
            /// Creates a client for the server at `base_url`.
            pub fn new(base_url: impl Into<String>) -> Result<Self, ::bindery::ClientError> {
                Ok(Self::with_client(base_url, ::bindery::client::http_client()?))
            }

            /// Creates a client that sends requests through `client`.
            pub fn with_client(base_url: impl Into<String>, client: ::reqwest::Client) -> Self {
                Self {
                    client,
                    base_url: base_url.into(),
                }
            }

            pub fn base_url(&self) -> &str {
                &self.base_url
            }

            #(#methods)*
        }
    };

    Ok(SourceFile::new(vec![CLIENT_MODULE.to_string()], tokens)
        .with_doc("HTTP client for the operations."))
}

fn client_method(
    operation: &OperationDescriptor,
    mapper: &TypeMapper<'_>,
) -> Result<TokenStream, GeneratorError> {
    let name = field_ident(&operation.operation_id);
    let path = &operation.path;
    let method = format_ident!("{}", operation.method.to_string());
    let response = mapper.model_path(&operation.response_body.class_name);

    let params = contract_params(operation, mapper)?;
    let args = params.iter().map(|p| {
        let ident = &p.ident;
        let ty = &p.ty;
        quote! { #ident: #ty }
    });

    let mut path_values = Vec::new();
    let mut query = Vec::new();
    let mut headers = Vec::new();
    for (param, descriptor) in params.iter().zip(&operation.params) {
        let ident = &param.ident;
        let wire = &descriptor.name;
        match descriptor.location {
            ParamLocation::Path => path_values.push(quote! { (#wire, #ident.to_string()) }),
            ParamLocation::Query => query.push(if descriptor.required() {
                quote! { query.push((#wire, #ident.to_string())); }
            } else {
                quote! {
                    if let Some(value) = &#ident {
                        query.push((#wire, value.to_string()));
                    }
                }
            }),
            ParamLocation::Header => headers.push(if descriptor.required() {
                quote! { request = request.header(#wire, #ident.to_string()); }
            } else {
                quote! {
                    if let Some(value) = &#ident {
                        request = request.header(#wire, value.to_string());
                    }
                }
            }),
        }
    }

    let query_call = if query.is_empty() {
        TokenStream::new()
    } else {
        quote! { .query(&query) }
    };
    let query_setup = (!query.is_empty()).then(|| {
        quote! {
            let mut query: Vec<(&str, String)> = Vec::new();
            #(#query)*
        }
    });

    let body = encode_body(operation, mapper)?;
    let request_binding = if headers.is_empty() && body.is_empty() {
        quote! { let request }
    } else {
        quote! { let mut request }
    };

    let arms = decode_arms(operation, mapper)?;
    let doc = doc_attrs(operation.summary.as_deref().unwrap_or(&operation.operation_id));

    Ok(quote! {
        #doc
        pub async fn #name(&self, #(#args),*) -> Result<#response, ::bindery::ClientError> {
            let url = ::bindery::client::endpoint_url(&self.base_url, #path, &[#(#path_values),*])?;
            #query_setup
            #request_binding = self.client.#method(url)#query_call;
            #(#headers)*
            #body
            let response = request.send().await?;
            match response.status().as_u16() {
                #(#arms)*
            }
        }
    })
}

/// `request = match request_body { ... };`, empty without a body.
fn encode_body(operation: &OperationDescriptor, mapper: &TypeMapper<'_>) -> Result<TokenStream, GeneratorError> {
    let Some(body) = &operation.request_body else {
        return Ok(TokenStream::new());
    };
    let class = mapper.model_path(&body.class_name);

    let arms = body
        .content
        .iter()
        .map(|(media, ty)| {
            let tag = type_ident(&media.to_string());
            let member = member_ident(ty);
            Ok(match media {
                MediaType::Json => quote! { #class::#tag { #member } => request.json(&#member), },
                MediaType::Form => quote! { #class::#tag { #member } => request.form(&#member), },
                MediaType::Xml => {
                    let mime = media.mime();
                    quote! {
                        #class::#tag { .. } => {
                            return Err(::bindery::ClientError::UnsupportedMediaType(#mime.to_string()));
                        }
                    }
                }
                MediaType::MultipartForm => {
                    let parts = multipart_parts(mapper, ty, &member)?;
                    quote! {
                        #class::#tag { #member } => {
                            let mut form = ::reqwest::multipart::Form::new();
                            #parts
                            request.multipart(form)
                        }
                    }
                }
            })
        })
        .collect::<Result<Vec<_>, GeneratorError>>()?;

    let encode = quote! {
        request = match request_body {
            #(#arms)*
        };
    };
    if body.required {
        Ok(encode)
    } else {
        Ok(quote! {
            if let Some(request_body) = request_body {
                #encode
            }
        })
    }
}

fn multipart_parts(
    mapper: &TypeMapper<'_>,
    ty: &TypeDescriptor,
    record: &Ident,
) -> Result<TokenStream, GeneratorError> {
    let (_, properties) = form_record(mapper, ty)?;
    let parts = properties.iter().map(|prop| {
        let field = field_ident(&prop.name);
        let wire = &prop.name;
        let (value, add) = if prop.ty.is_file_upload() {
            (
                quote! { upload },
                quote! {
                    form = form.part(
                        #wire,
                        ::bindery::client::file_part(&upload.name, &upload.file, &upload.content_type).await?,
                    );
                },
            )
        } else {
            (quote! { value }, quote! { form = form.text(#wire, value.to_string()); })
        };
        if prop.required {
            quote! {
                let #value = &#record.#field;
                #add
            }
        } else {
            quote! {
                if let Some(#value) = &#record.#field {
                    #add
                }
            }
        }
    });
    Ok(quote! { #({ #parts })* })
}

fn decode_arms(operation: &OperationDescriptor, mapper: &TypeMapper<'_>) -> Result<Vec<TokenStream>, GeneratorError> {
    let response_body = &operation.response_body;
    let class = mapper.model_path(&response_body.class_name);

    let mut arms = Vec::with_capacity(response_body.variants.len() + 1);
    for (status, variant) in &response_body.variants {
        let decode = decode_variant(&class, variant, mapper)?;
        arms.push(match status {
            ResponseStatus::Code(code) => {
                let code = Literal::u16_unsuffixed(*code);
                quote! { #code => { #decode } }
            }
            ResponseStatus::Default => continue,
        });
    }
    match response_body.default_variant() {
        Some(variant) => {
            let decode = decode_variant(&class, variant, mapper)?;
            arms.push(quote! { _ => { #decode } });
        }
        None => arms.push(quote! {
            _ => Err(::bindery::client::unexpected_status(response).await),
        }),
    }
    Ok(arms)
}

fn decode_variant(
    class: &TokenStream,
    variant: &ResponseVariant,
    mapper: &TypeMapper<'_>,
) -> Result<TokenStream, GeneratorError> {
    let tag = type_ident(variant.name());

    let headers = match variant.headers() {
        None => TokenStream::new(),
        Some(headers) => {
            let binding = member_ident(headers);
            let ty = mapper.rust_type(headers)?;
            let TypeDescriptor::Object { properties, .. } = headers else {
                return Err(GeneratorError::CodeGenError(format!(
                    "headers of '{}' are not an object",
                    variant.name()
                )));
            };
            let fields = properties
                .iter()
                .map(|prop| {
                    let field = field_ident(&prop.name);
                    let wire = &prop.name;
                    let primitive = prop.ty.primitive().ok_or_else(|| {
                        GeneratorError::CodeGenError(format!("header '{}' is not a scalar", wire))
                    })?;
                    let parser = parser_fn(primitive);
                    let read = if prop.required {
                        quote! { ::bindery::client::required_header }
                    } else {
                        quote! { ::bindery::client::optional_header }
                    };
                    Ok(quote! { #field: #read(response.headers(), #wire, #parser)?, })
                })
                .collect::<Result<Vec<_>, GeneratorError>>()?;
            quote! {
                let #binding = #ty { #(#fields)* };
            }
        }
    };

    let body = match variant.body() {
        None => TokenStream::new(),
        Some(body) if variant.is_file() => {
            let binding = member_ident(body);
            quote! { let #binding = ::bindery::client::download_to_temp(response).await?; }
        }
        Some(body) => {
            let binding = member_ident(body);
            let ty = mapper.rust_type(body)?;
            quote! { let #binding = response.json::<#ty>().await?; }
        }
    };

    let members: Vec<Ident> = variant.members().iter().map(member_ident).collect();
    let value = if members.is_empty() {
        quote! { #class::#tag }
    } else {
        quote! { #class::#tag { #(#members),* } }
    };

    Ok(quote! {
        #headers
        #body
        Ok(#value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{compact, pet_store_metadata, rendered};

    fn client() -> String {
        compact(&rendered(&emit_client(&pet_store_metadata()).unwrap()))
    }

    #[test]
    fn client_struct_and_constructors() {
        let code = client();
        assert!(code.contains("pubstructPetstoreClient{client:::reqwest::Client,base_url:String,}"));
        assert!(code.contains("::bindery::client::http_client()?"));
    }

    #[test]
    fn methods_mirror_the_contract() {
        let code = client();
        assert!(code.contains("pubasyncfnshow_pet_by_id(&self,pet_id:String,x_version:i32"));
        assert!(code.contains("Result<models::ShowPetByIdResponse,::bindery::ClientError>"));
    }

    #[test]
    fn params_go_to_their_locations() {
        let code = client();
        assert!(code.contains("endpoint_url(&self.base_url,\"/pets/{petId}\",&[(\"petId\",pet_id.to_string())])"));
        assert!(code.contains("ifletSome(value)=&limit{query.push((\"limit\",value.to_string()));}"));
        assert!(code.contains("request=request.header(\"x-version\",x_version.to_string());"));
    }

    #[test]
    fn body_encoding_by_variant() {
        let code = client();
        assert!(code.contains("models::CreatePetRequest::Json{pet}=>request.json(&pet),"));
        assert!(code.contains("models::CreatePetRequest::Form{pet}=>request.form(&pet),"));
        assert!(code.contains("::bindery::ClientError::UnsupportedMediaType(\"application/xml\".to_string())"));
        assert!(code.contains("form=form.part(\"photo\",::bindery::client::file_part(&upload.name,&upload.file,&upload.content_type)"));
    }

    #[test]
    fn statuses_decode_to_variants() {
        let code = client();
        assert!(code.contains("204=>"));
        assert!(code.contains("Ok(models::DeletePetResponse::NoContent)"));
        assert!(code.contains("letfile=::bindery::client::download_to_temp(response).await?;"));
        assert!(code.contains("_=>Err(::bindery::client::unexpected_status(response).await),"));
        assert!(code.contains("location:::bindery::client::required_header(response.headers(),\"Location\",::bindery::parse_string)?"));
    }
}
