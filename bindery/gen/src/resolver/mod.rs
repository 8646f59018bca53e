//! Schema resolution: OpenAPI document to [`SpecMetadata`].
//!
//! The resolver walks every operation in document order and turns its
//! parameters, request body and responses into [`TypeDescriptor`]s. Named
//! schemas reached through `$ref` are resolved once into the
//! [`RefTable`](bindery_define::RefTable) and referred to by placeholder
//! everywhere else.
//!
//! Anything the type model cannot express is a [`ResolveError`]; nothing is
//! emitted for a document that fails to resolve.

mod bodies;
mod error;
mod schemas;

use std::collections::HashSet;

use bindery_define::naming::{self, pascal_case};
use bindery_define::openapi::{Operation, Parameter, ParameterOrRef, PathItem, SecurityRequirement};
use bindery_define::{
    HttpMethod, OpenApiDocument, OperationDescriptor, ParamDescriptor, ParamLocation, RefTable,
    SecurityScheme, SpecMetadata, TypeDescriptor, TypePropertyDescriptor,
};
use indexmap::IndexMap;

pub use error::ResolveError;

use crate::parser::extract_path_params;

/// Resolves a document into the metadata every emitter works from.
///
/// `name_prefix` is converted to PascalCase and names the generated
/// contract, controller and client.
///
/// ## Errors
///
/// Returns the first construct the type model cannot represent.
pub fn resolve(doc: &OpenApiDocument, name_prefix: &str) -> Result<SpecMetadata, ResolveError> {
    let mut resolver = Resolver::new(doc);
    let mut operations = Vec::new();

    for (path, item) in &doc.paths {
        for (method, operation) in methods(item) {
            operations.push(resolver.operation(path, method, item, operation)?);
        }
    }

    tracing::info!(
        operations = operations.len(),
        schemas = resolver.refs.len(),
        "resolved document"
    );

    Ok(SpecMetadata {
        name_prefix: type_name(name_prefix, "Name prefix")?,
        operations,
        refs: resolver.refs,
    })
}

/// A type name derived from `raw`, or an error naming where `raw` came from.
pub(crate) fn type_name(raw: &str, context: &str) -> Result<String, ResolveError> {
    naming::type_name(raw).ok_or_else(|| ResolveError::InvalidName {
        name: raw.to_string(),
        context: context.to_string(),
    })
}

/// Operations of a path item in a fixed method order.
fn methods(item: &PathItem) -> impl Iterator<Item = (HttpMethod, &Operation)> {
    [
        (HttpMethod::Get, &item.get),
        (HttpMethod::Post, &item.post),
        (HttpMethod::Put, &item.put),
        (HttpMethod::Patch, &item.patch),
        (HttpMethod::Delete, &item.delete),
    ]
    .into_iter()
    .filter_map(|(method, op)| op.as_ref().map(|op| (method, op)))
}

/// Resolution state for one document.
pub(crate) struct Resolver<'a> {
    doc: &'a OpenApiDocument,
    refs: RefTable,
    in_progress: HashSet<String>,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(doc: &'a OpenApiDocument) -> Self {
        Self {
            doc,
            refs: RefTable::default(),
            in_progress: HashSet::new(),
        }
    }

    fn operation(
        &mut self,
        path: &str,
        method: HttpMethod,
        item: &'a PathItem,
        operation: &'a Operation,
    ) -> Result<OperationDescriptor, ResolveError> {
        let operation_id = operation
            .operation_id
            .clone()
            .ok_or_else(|| ResolveError::MissingOperationId {
                method: method.to_string().to_uppercase(),
                path: path.to_string(),
            })?;
        tracing::debug!(%method, path, operation_id = %operation_id, "resolving operation");
        type_name(&operation_id, "operationId")?;

        let mut params = Vec::new();
        let security = self.security(operation)?;
        if let Some(scheme) = &security {
            params.push(ParamDescriptor {
                name: scheme.header_name().to_string(),
                location: ParamLocation::Header,
                property: TypePropertyDescriptor::new(
                    scheme.header_name(),
                    TypeDescriptor::Primitive(bindery_define::Primitive::String),
                    true,
                ),
            });
        }

        for param in self.params(&operation_id, item, operation)? {
            let duplicate = security.as_ref().is_some_and(|scheme| {
                param.location == ParamLocation::Header
                    && param.name.eq_ignore_ascii_case(scheme.header_name())
            });
            if duplicate {
                tracing::debug!(param = %param.name, "security header already synthesized");
                continue;
            }
            params.push(param);
        }

        for name in extract_path_params(path) {
            let declared = params
                .iter()
                .any(|p| p.location == ParamLocation::Path && p.name == name);
            if !declared {
                return Err(ResolveError::UndeclaredPathParam {
                    name: name.to_string(),
                    path: path.to_string(),
                });
            }
        }

        let request_body = self.request_body(&operation_id, operation)?;
        let response_body = self.response_body(&operation_id, operation)?;

        Ok(OperationDescriptor {
            path: path.to_string(),
            method,
            summary: operation.summary.clone().or_else(|| operation.description.clone()),
            operation_id,
            params,
            request_body,
            response_body,
        })
    }

    /// Picks the security scheme of an operation. Operation requirements
    /// override document requirements; only the first scheme is used.
    fn security(&self, operation: &Operation) -> Result<Option<SecurityScheme>, ResolveError> {
        let requirements: &[SecurityRequirement] = operation
            .security
            .as_deref()
            .or(self.doc.security.as_deref())
            .unwrap_or_default();
        let Some(name) = requirements.first().and_then(|r| r.keys().next()) else {
            return Ok(None);
        };

        let scheme = self
            .doc
            .components
            .security_schemes
            .get(name)
            .ok_or_else(|| ResolveError::UnknownSecurityScheme { name: name.clone() })?;

        let unsupported = |reason: &str| ResolveError::UnsupportedSecurityScheme {
            name: name.clone(),
            reason: reason.to_string(),
        };

        match scheme.scheme_type.as_str() {
            "http" => match scheme.scheme.as_deref() {
                Some(s) if s.eq_ignore_ascii_case("bearer") => Ok(Some(SecurityScheme::BearerToken)),
                _ => Err(unsupported("only the bearer http scheme is supported")),
            },
            "apiKey" => match (scheme.location.as_deref(), &scheme.name) {
                (Some("header"), Some(header)) => Ok(Some(SecurityScheme::SecurityHeader {
                    header_name: header.clone(),
                })),
                _ => Err(unsupported("api keys must be passed in a header")),
            },
            other => Err(unsupported(&format!("scheme type '{}'", other))),
        }
    }

    /// Path-level then operation-level parameters; an operation parameter
    /// replaces a path-level one with the same name and location.
    fn params(
        &mut self,
        operation_id: &str,
        item: &'a PathItem,
        operation: &'a Operation,
    ) -> Result<Vec<ParamDescriptor>, ResolveError> {
        let mut merged: IndexMap<(String, String), &'a Parameter> = IndexMap::new();
        for param in item.parameters.iter().chain(&operation.parameters) {
            let param = self.follow_param(param)?;
            merged.insert((param.name.clone(), param.location.clone()), param);
        }

        let mut params = Vec::with_capacity(merged.len());
        for param in merged.into_values() {
            let location: ParamLocation =
                param
                    .location
                    .parse()
                    .map_err(|_| ResolveError::UnsupportedParamLocation {
                        name: param.name.clone(),
                        operation_id: operation_id.to_string(),
                        location: param.location.clone(),
                    })?;

            let context = format!("{}{}", pascal_case(operation_id), pascal_case(&param.name));
            let primitive = self
                .primitive_of(param.schema.as_ref(), &context)?
                .ok_or_else(|| ResolveError::NonPrimitiveParam {
                    name: param.name.clone(),
                    operation_id: operation_id.to_string(),
                })?;

            let required = param.required || location == ParamLocation::Path;
            params.push(ParamDescriptor {
                name: param.name.clone(),
                location,
                property: TypePropertyDescriptor::new(
                    param.name.clone(),
                    TypeDescriptor::Primitive(primitive),
                    required,
                ),
            });
        }
        Ok(params)
    }

    fn follow_param(&self, param: &'a ParameterOrRef) -> Result<&'a Parameter, ResolveError> {
        let doc = self.doc;
        let mut current = param;
        for _ in 0..=doc.components.parameters.len() {
            match current {
                ParameterOrRef::Parameter(param) => return Ok(param),
                ParameterOrRef::Ref { ref_path } => {
                    current = doc
                        .parameter(ref_path)
                        .ok_or_else(|| ResolveError::UnresolvedRef {
                            pointer: ref_path.clone(),
                        })?;
                }
            }
        }
        let pointer = match param {
            ParameterOrRef::Ref { ref_path } => ref_path.clone(),
            ParameterOrRef::Parameter(param) => param.name.clone(),
        };
        Err(ResolveError::UnresolvedRef { pointer })
    }
}

#[cfg(test)]
mod tests {
    use bindery_define::{MediaType, Primitive, ResponseStatus};

    use super::*;

    fn resolve_yaml(yaml: &str) -> Result<SpecMetadata, ResolveError> {
        resolve(&OpenApiDocument::from_yaml_str(yaml).unwrap(), "test")
    }

    const PETS: &str = r##"
openapi: 3.0.0
security:
  - bearerAuth: []
paths:
  /pets/{petId}:
    parameters:
      - $ref: '#/components/parameters/petId'
      - name: verbose
        in: query
        schema: { type: boolean }
    get:
      operationId: showPetById
      security: []
      parameters:
        - name: verbose
          in: query
          required: true
          schema: { type: boolean }
        - name: x-version
          in: header
          required: true
          schema: { type: integer, format: int64 }
      responses:
        '200':
          description: ok
          content:
            application/json:
              schema: { $ref: '#/components/schemas/Pet' }
    delete:
      operationId: deletePet
      parameters:
        - name: Authorization
          in: header
          schema: { type: string }
      responses:
        '204':
          description: deleted
    post:
      operationId: touchPet
      responses:
        '200':
          description: ok
components:
  securitySchemes:
    bearerAuth:
      type: http
      scheme: bearer
  parameters:
    petId:
      name: petId
      in: path
      schema: { type: string }
  schemas:
    Pet:
      type: object
      properties:
        id: { type: integer, format: int64 }
"##;

    #[test]
    fn operations_follow_method_order() {
        let metadata = resolve_yaml(PETS).unwrap();
        let ids: Vec<_> = metadata
            .operations
            .iter()
            .map(|op| op.operation_id.as_str())
            .collect();
        assert_eq!(ids, ["showPetById", "touchPet", "deletePet"]);
        assert_eq!(metadata.name_prefix, "Test");
    }

    #[test]
    fn operation_params_override_path_params() {
        let metadata = resolve_yaml(PETS).unwrap();
        let show = &metadata.operations[0];

        let names: Vec<_> = show.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["petId", "verbose", "x-version"]);

        assert!(show.params[0].required(), "path params are always required");
        assert!(show.params[1].required(), "operation-level override wins");
        assert_eq!(
            show.params[2].property.ty,
            TypeDescriptor::Primitive(Primitive::Int64)
        );
    }

    #[test]
    fn security_param_is_prepended() {
        let metadata = resolve_yaml(PETS).unwrap();
        let touch = &metadata.operations[1];

        assert_eq!(touch.params[0].name, "Authorization");
        assert_eq!(touch.params[0].location, ParamLocation::Header);
        assert!(touch.params[0].required());
    }

    #[test]
    fn explicit_security_header_is_not_duplicated() {
        let metadata = resolve_yaml(PETS).unwrap();
        let delete = &metadata.operations[2];

        let headers: Vec<_> = delete
            .params_in(ParamLocation::Header)
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(headers, ["Authorization"]);
        assert!(delete.params[0].required());
    }

    #[test]
    fn empty_operation_security_disables_document_security() {
        let metadata = resolve_yaml(PETS).unwrap();
        let show = &metadata.operations[0];
        assert!(show.params.iter().all(|p| p.name != "Authorization"));
    }

    #[test]
    fn shared_refs_are_resolved_once() {
        let metadata = resolve_yaml(PETS).unwrap();
        assert_eq!(metadata.refs.len(), 1);
        assert!(metadata.refs.contains("#/components/schemas/Pet"));

        let show = &metadata.operations[0];
        assert_eq!(
            show.response_body.variants[&ResponseStatus::Code(200)].body(),
            Some(&TypeDescriptor::reference("#/components/schemas/Pet"))
        );
        assert!(show.request_body.is_none());
    }

    #[test]
    fn api_key_header_scheme() {
        let yaml = r##"
paths:
  /admin:
    get:
      operationId: admin
      security:
        - apiKey: []
      responses:
        '204': { description: ok }
components:
  securitySchemes:
    apiKey:
      type: apiKey
      in: header
      name: X-Api-Key
"##;
        let metadata = resolve_yaml(yaml).unwrap();
        assert_eq!(metadata.operations[0].params[0].name, "X-Api-Key");
    }

    #[test]
    fn missing_operation_id_is_fatal() {
        let yaml = r##"
paths:
  /pets:
    get:
      responses:
        '204': { description: ok }
"##;
        assert_eq!(
            resolve_yaml(yaml).unwrap_err(),
            ResolveError::MissingOperationId {
                method: "GET".into(),
                path: "/pets".into()
            }
        );
    }

    #[test]
    fn schema_and_operation_names_become_identifiers() {
        let yaml = r##"
paths:
  /models:
    get:
      operationId: list 3D models!
      responses:
        '200':
          description: ok
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/3DModel'
components:
  schemas:
    3DModel:
      type: object
      properties:
        id: { type: integer }
"##;
        let metadata = resolve_yaml(yaml).unwrap();
        let list = &metadata.operations[0];
        assert_eq!(list.response_body.class_name, "List3DModelsResponse");
        assert_eq!(list.response_body.variants[&ResponseStatus::Code(200)].name(), "_3DModel");

        let model_ref = TypeDescriptor::reference("#/components/schemas/3DModel");
        let model = metadata
            .refs
            .resolve(&model_ref)
            .and_then(|ty| ty.name());
        assert_eq!(model, Some("_3DModel"));
    }

    #[test]
    fn unusable_operation_id_is_fatal() {
        let yaml = r##"
paths:
  /pets:
    get:
      operationId: '???'
      responses:
        '204': { description: ok }
"##;
        assert_eq!(
            resolve_yaml(yaml).unwrap_err(),
            ResolveError::InvalidName {
                name: "???".into(),
                context: "operationId".into()
            }
        );
    }

    #[test]
    fn unsupported_security_is_fatal() {
        let yaml = r##"
paths:
  /pets:
    get:
      operationId: listPets
      security:
        - basic: []
      responses:
        '204': { description: ok }
components:
  securitySchemes:
    basic:
      type: http
      scheme: basic
"##;
        assert!(matches!(
            resolve_yaml(yaml),
            Err(ResolveError::UnsupportedSecurityScheme { .. })
        ));
    }

    #[test]
    fn unknown_security_is_fatal() {
        let yaml = r##"
paths:
  /pets:
    get:
      operationId: listPets
      security:
        - missing: []
      responses:
        '204': { description: ok }
"##;
        assert_eq!(
            resolve_yaml(yaml).unwrap_err(),
            ResolveError::UnknownSecurityScheme {
                name: "missing".into()
            }
        );
    }

    #[test]
    fn undeclared_path_param_is_fatal() {
        let yaml = r##"
paths:
  /pets/{petId}:
    get:
      operationId: showPet
      responses:
        '204': { description: ok }
"##;
        assert!(matches!(
            resolve_yaml(yaml),
            Err(ResolveError::UndeclaredPathParam { name, .. }) if name == "petId"
        ));
    }

    #[test]
    fn object_param_is_fatal() {
        let yaml = r##"
paths:
  /pets:
    get:
      operationId: listPets
      parameters:
        - name: filter
          in: query
          schema:
            type: object
            properties:
              tag: { type: string }
      responses:
        '204': { description: ok }
"##;
        assert!(matches!(
            resolve_yaml(yaml),
            Err(ResolveError::NonPrimitiveParam { .. })
        ));
    }

    #[test]
    fn cookie_param_is_fatal() {
        let yaml = r##"
paths:
  /pets:
    get:
      operationId: listPets
      parameters:
        - name: session
          in: cookie
          schema: { type: string }
      responses:
        '204': { description: ok }
"##;
        assert!(matches!(
            resolve_yaml(yaml),
            Err(ResolveError::UnsupportedParamLocation { location, .. }) if location == "cookie"
        ));
    }

    #[test]
    fn request_media_types_in_document_order() {
        let yaml = r##"
paths:
  /pets:
    post:
      operationId: createPet
      requestBody:
        required: true
        content:
          application/x-www-form-urlencoded:
            schema: { $ref: '#/components/schemas/Pet' }
          application/json; charset=utf-8:
            schema: { $ref: '#/components/schemas/Pet' }
      responses:
        '201': { description: created }
components:
  schemas:
    Pet:
      type: object
      properties:
        name: { type: string }
"##;
        let metadata = resolve_yaml(yaml).unwrap();
        let body = metadata.operations[0].request_body.as_ref().unwrap();
        assert_eq!(body.class_name, "CreatePetRequest");
        assert!(body.required);
        let media: Vec<_> = body.content.keys().copied().collect();
        assert_eq!(media, [MediaType::Form, MediaType::Json]);
    }
}
