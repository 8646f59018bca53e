//! Request and response bodies.

use bindery_define::naming::{pascal_case, simple_name};
use bindery_define::openapi::{MediaTypeObject, Operation, ResponseObject};
use bindery_define::{
    MediaType, Primitive, RequestBody, ResponseBody, ResponseStatus, ResponseVariant,
    TypeDescriptor, TypePropertyDescriptor,
};
use indexmap::IndexMap;

use super::{ResolveError, Resolver, type_name};

/// Variant name of a body-less or anonymous-body response.
fn status_name(status: ResponseStatus) -> Option<&'static str> {
    match status {
        ResponseStatus::Code(200) => Some("Ok"),
        ResponseStatus::Code(201) => Some("Created"),
        ResponseStatus::Code(204) => Some("NoContent"),
        ResponseStatus::Code(302) => Some("Redirect"),
        ResponseStatus::Code(402) => Some("PaymentRequired"),
        ResponseStatus::Code(404) => Some("NotFound"),
        ResponseStatus::Code(422) => Some("UnprocessableContent"),
        _ => None,
    }
}

/// `application/json; charset=utf-8` -> `application/json`
fn essence(mime: &str) -> String {
    mime.split(';').next().unwrap_or_default().trim().to_ascii_lowercase()
}

fn json_content(content: &IndexMap<String, MediaTypeObject>) -> Option<&MediaTypeObject> {
    content
        .iter()
        .find(|(mime, _)| essence(mime) == MediaType::Json.mime())
        .map(|(_, media)| media)
}

impl<'a> Resolver<'a> {
    pub(crate) fn request_body(
        &mut self,
        operation_id: &str,
        operation: &'a Operation,
    ) -> Result<Option<RequestBody>, ResolveError> {
        let Some(body) = &operation.request_body else {
            return Ok(None);
        };

        let mut content = IndexMap::new();
        for (mime, media) in &body.content {
            let Some(media_type) = MediaType::from_mime(&essence(mime)) else {
                tracing::warn!(operation_id, mime = %mime, "skipping unsupported request media type");
                continue;
            };
            let Some(pointer) = media.schema.as_ref().and_then(|s| s.ref_path.as_deref()) else {
                tracing::warn!(
                    operation_id,
                    mime = %mime,
                    "skipping request body without a $ref schema"
                );
                continue;
            };
            let ty = self.reference(pointer)?;
            content.entry(media_type).or_insert(ty);
        }

        if content.is_empty() {
            tracing::warn!(operation_id, "request body has no supported content");
            return Ok(None);
        }

        Ok(Some(RequestBody {
            class_name: format!("{}Request", type_name(operation_id, "operationId")?),
            required: body.required,
            content,
        }))
    }

    pub(crate) fn response_body(
        &mut self,
        operation_id: &str,
        operation: &'a Operation,
    ) -> Result<ResponseBody, ResolveError> {
        let class_name = format!("{}Response", type_name(operation_id, "operationId")?);
        let mut variants: IndexMap<ResponseStatus, ResponseVariant> = IndexMap::new();

        for (status, response) in &operation.responses {
            let status: ResponseStatus =
                status
                    .parse()
                    .map_err(|_| ResolveError::UnsupportedStatus {
                        status: status.clone(),
                        operation_id: operation_id.to_string(),
                    })?;
            let variant = self.response_variant(operation_id, &class_name, status, response)?;

            if status == ResponseStatus::Default {
                self.check_default(operation_id, &variant)?;
            }
            if variants.values().any(|v| v.name() == variant.name()) {
                return Err(ResolveError::DuplicateVariant {
                    name: variant.name().to_string(),
                    operation_id: operation_id.to_string(),
                });
            }
            variants.insert(status, variant);
        }

        Ok(ResponseBody {
            class_name,
            variants,
        })
    }

    fn response_variant(
        &mut self,
        operation_id: &str,
        class_name: &str,
        status: ResponseStatus,
        response: &'a ResponseObject,
    ) -> Result<ResponseVariant, ResolveError> {
        let unmapped = || ResolveError::UnmappedStatus {
            status: status.to_string(),
            operation_id: operation_id.to_string(),
        };

        if let Some(schema) = json_content(&response.content).and_then(|m| m.schema.as_ref()) {
            let (name, body) = match &schema.ref_path {
                Some(pointer) => {
                    let body = self.reference(pointer)?;
                    let named = matches!(
                        self.refs.resolve(&body),
                        Some(TypeDescriptor::Object { .. } | TypeDescriptor::Array { .. })
                    );
                    let name = if named {
                        type_name(simple_name(pointer), "Schema")?
                    } else {
                        status_name(status).ok_or_else(unmapped)?.to_string()
                    };
                    (name, body)
                }
                None => {
                    let name = status_name(status).ok_or_else(unmapped)?.to_string();
                    let body = self.type_of(schema, &format!("{}{}Body", class_name, name))?;
                    (name, body)
                }
            };
            let headers = self.response_headers(operation_id, class_name, &name, response)?;
            return Ok(ResponseVariant::Parametrized {
                name,
                headers,
                body,
                is_file: false,
            });
        }

        let binary = response.content.values().any(|media| match &media.schema {
            None => true,
            Some(schema) => schema.ref_path.is_none() && schema.schema_type.as_deref() == Some("string"),
        });
        if binary {
            let name = "File".to_string();
            let headers = self.response_headers(operation_id, class_name, &name, response)?;
            return Ok(ResponseVariant::Parametrized {
                name,
                headers,
                body: TypeDescriptor::File,
                is_file: true,
            });
        }
        if !response.content.is_empty() {
            tracing::warn!(operation_id, %status, "ignoring unsupported response content");
        }

        let name = status_name(status).ok_or_else(unmapped)?.to_string();
        let headers = self.response_headers(operation_id, class_name, &name, response)?;
        Ok(ResponseVariant::JustStatus { name, headers })
    }

    /// Declared response headers as a named object, `None` if there are none.
    fn response_headers(
        &mut self,
        operation_id: &str,
        class_name: &str,
        variant: &str,
        response: &'a ResponseObject,
    ) -> Result<Option<TypeDescriptor>, ResolveError> {
        if response.headers.is_empty() {
            return Ok(None);
        }
        let name = format!("{}{}Headers", class_name, variant);

        let mut properties = Vec::with_capacity(response.headers.len());
        for (header, object) in &response.headers {
            let context = format!("{}{}", name, pascal_case(header));
            let primitive = self
                .primitive_of(object.schema.as_ref(), &context)?
                .ok_or_else(|| ResolveError::NonPrimitiveHeader {
                    name: header.clone(),
                    operation_id: operation_id.to_string(),
                })?;
            properties.push(TypePropertyDescriptor::new(
                header.clone(),
                TypeDescriptor::Primitive(primitive),
                object.required,
            ));
        }

        Ok(Some(TypeDescriptor::Object {
            name: Some(name),
            properties,
        }))
    }

    /// The default response takes its status from a required integer `code`.
    fn check_default(&self, operation_id: &str, variant: &ResponseVariant) -> Result<(), ResolveError> {
        let has_code = variant
            .body()
            .filter(|_| !variant.is_file())
            .and_then(|body| self.refs.resolve(body))
            .is_some_and(|body| match body {
                TypeDescriptor::Object { properties, .. } => properties.iter().any(|p| {
                    p.name == "code"
                        && p.required
                        && matches!(
                            p.ty.primitive(),
                            Some(Primitive::Int | Primitive::Int64)
                        )
                }),
                _ => false,
            });
        if has_code {
            Ok(())
        } else {
            Err(ResolveError::DefaultWithoutCode {
                operation_id: operation_id.to_string(),
            })
        }
    }
}
