//! Schema to type descriptor resolution.

use bindery_define::naming::{pascal_case, simple_name};
use bindery_define::openapi::Schema;
use bindery_define::{Primitive, TypeDescriptor, TypePropertyDescriptor};

use super::{ResolveError, Resolver, type_name};

impl<'a> Resolver<'a> {
    /// Resolves a schema in place. `context` names inline objects that need
    /// a type of their own.
    pub(crate) fn type_of(
        &mut self,
        schema: &'a Schema,
        context: &str,
    ) -> Result<TypeDescriptor, ResolveError> {
        if let Some(pointer) = &schema.ref_path {
            return self.reference(pointer);
        }
        if schema.is_composition() {
            return Err(ResolveError::UnsupportedComposition {
                context: context.to_string(),
            });
        }
        match schema.schema_type.as_deref() {
            Some("integer") => Ok(TypeDescriptor::Primitive(
                if schema.format.as_deref() == Some("int64") {
                    Primitive::Int64
                } else {
                    Primitive::Int
                },
            )),
            Some("number") => Ok(TypeDescriptor::Primitive(Primitive::Float)),
            Some("string") if schema.is_binary() => Ok(TypeDescriptor::FileUpload),
            Some("string") => Ok(TypeDescriptor::Primitive(Primitive::String)),
            Some("boolean") => Ok(TypeDescriptor::Primitive(Primitive::Boolean)),
            Some("array") => {
                let items = schema
                    .items
                    .as_deref()
                    .ok_or_else(|| ResolveError::MissingItems {
                        context: context.to_string(),
                    })?;
                Ok(TypeDescriptor::Array {
                    name: None,
                    element: Box::new(self.type_of(items, &format!("{}Item", context))?),
                })
            }
            Some("object") | None => self.object(None, schema, context),
            Some(other) => Err(ResolveError::UnsupportedType {
                schema_type: other.to_string(),
                context: context.to_string(),
            }),
        }
    }

    /// Resolves a `$ref` pointer, registering its target once.
    ///
    /// A pointer reached again while its own resolution is still in
    /// progress is marked recursive and returned as a placeholder.
    pub(crate) fn reference(&mut self, pointer: &str) -> Result<TypeDescriptor, ResolveError> {
        if self.refs.contains(pointer) {
            return Ok(TypeDescriptor::reference(pointer));
        }
        if self.in_progress.contains(pointer) {
            tracing::debug!(pointer, "recursive reference");
            self.refs.mark_recursive(pointer);
            return Ok(TypeDescriptor::reference(pointer));
        }

        let doc = self.doc;
        let schema = doc
            .schema(pointer)
            .ok_or_else(|| ResolveError::UnresolvedRef {
                pointer: pointer.to_string(),
            })?;
        let name = type_name(simple_name(pointer), "Schema")?;

        self.in_progress.insert(pointer.to_string());
        let resolved = self.named(schema, &name);
        self.in_progress.remove(pointer);

        tracing::trace!(pointer, "resolved reference");
        self.refs.insert(pointer, resolved?);
        Ok(TypeDescriptor::reference(pointer))
    }

    /// Resolves the target of a named schema: arrays and objects keep the name.
    fn named(&mut self, schema: &'a Schema, name: &str) -> Result<TypeDescriptor, ResolveError> {
        if schema.ref_path.is_some() || schema.is_composition() {
            return self.type_of(schema, name);
        }
        match schema.schema_type.as_deref() {
            Some("array") => {
                let items = schema
                    .items
                    .as_deref()
                    .ok_or_else(|| ResolveError::MissingItems {
                        context: name.to_string(),
                    })?;
                Ok(TypeDescriptor::Array {
                    name: Some(name.to_string()),
                    element: Box::new(self.type_of(items, &format!("{}Item", name))?),
                })
            }
            Some("object") | None => self.object(Some(name.to_string()), schema, name),
            _ => self.type_of(schema, name),
        }
    }

    /// Resolves an object. Inline objects with properties are named after
    /// `context`; inline objects without properties stay anonymous maps.
    pub(crate) fn object(
        &mut self,
        name: Option<String>,
        schema: &'a Schema,
        context: &str,
    ) -> Result<TypeDescriptor, ResolveError> {
        let mut properties = Vec::with_capacity(schema.properties.len());
        for (prop_name, prop_schema) in &schema.properties {
            let ty = self.type_of(prop_schema, &format!("{}{}", context, pascal_case(prop_name)))?;
            properties.push(TypePropertyDescriptor {
                name: prop_name.clone(),
                ty,
                format: prop_schema.format.clone(),
                required: schema.required.contains(prop_name),
            });
        }
        let name = match name {
            Some(name) => Some(name),
            None if !properties.is_empty() => Some(context.to_string()),
            None => None,
        };
        Ok(TypeDescriptor::Object { name, properties })
    }

    /// Resolves a parameter or header schema. `Ok(None)` means the schema
    /// is not a scalar; a missing schema is a string.
    pub(crate) fn primitive_of(
        &mut self,
        schema: Option<&'a Schema>,
        context: &str,
    ) -> Result<Option<Primitive>, ResolveError> {
        let Some(schema) = schema else {
            return Ok(Some(Primitive::String));
        };
        let ty = self.type_of(schema, context)?;
        Ok(self.refs.resolve(&ty).and_then(TypeDescriptor::primitive))
    }
}

#[cfg(test)]
mod tests {
    use bindery_define::{OpenApiDocument, TypeDescriptor};

    use super::*;

    fn doc(yaml: &str) -> OpenApiDocument {
        OpenApiDocument::from_yaml_str(yaml).unwrap()
    }

    const SCHEMAS: &str = r##"
openapi: 3.0.0
paths: {}
components:
  schemas:
    Pet:
      type: object
      required: [id]
      properties:
        id: { type: integer, format: int64 }
        owner: { $ref: '#/components/schemas/Owner' }
        address:
          type: object
          properties:
            city: { type: string }
        extra:
          type: object
    Owner:
      type: object
      properties:
        name: { type: string }
    Pets:
      type: array
      items: { $ref: '#/components/schemas/Pet' }
    Node:
      type: object
      properties:
        next: { $ref: '#/components/schemas/Node' }
    Mixed:
      oneOf:
        - { $ref: '#/components/schemas/Pet' }
    Weird:
      type: tuple
"##;

    #[test]
    fn reference_is_resolved_once() {
        let doc = doc(SCHEMAS);
        let mut resolver = Resolver::new(&doc);

        let first = resolver.reference("#/components/schemas/Pets").unwrap();
        let table_size = resolver.refs.len();
        let second = resolver.reference("#/components/schemas/Pets").unwrap();

        assert_eq!(first, second);
        assert_eq!(resolver.refs.len(), table_size);
        assert_eq!(table_size, 3); // Pets, Pet, Owner
    }

    #[test]
    fn named_array_keeps_name() {
        let doc = doc(SCHEMAS);
        let mut resolver = Resolver::new(&doc);
        resolver.reference("#/components/schemas/Pets").unwrap();

        match resolver.refs.get("#/components/schemas/Pets").unwrap() {
            TypeDescriptor::Array { name, element } => {
                assert_eq!(name.as_deref(), Some("Pets"));
                assert_eq!(**element, TypeDescriptor::reference("#/components/schemas/Pet"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn inline_objects_get_derived_names() {
        let doc = doc(SCHEMAS);
        let mut resolver = Resolver::new(&doc);
        resolver.reference("#/components/schemas/Pet").unwrap();

        let TypeDescriptor::Object { properties, .. } =
            resolver.refs.get("#/components/schemas/Pet").unwrap()
        else {
            panic!("expected object");
        };
        assert!(properties[0].required);
        assert_eq!(properties[0].ty, TypeDescriptor::Primitive(Primitive::Int64));
        assert!(!properties[1].required);
        assert_eq!(properties[2].ty.name(), Some("PetAddress"));
        assert!(properties[3].ty.is_dynamic_map());
        assert_eq!(properties[3].ty.name(), None);
    }

    #[test]
    fn recursive_reference_is_marked() {
        let doc = doc(SCHEMAS);
        let mut resolver = Resolver::new(&doc);
        resolver.reference("#/components/schemas/Node").unwrap();

        assert!(resolver.refs.is_recursive("#/components/schemas/Node"));
        assert!(resolver.refs.contains("#/components/schemas/Node"));
    }

    #[test]
    fn unresolvable_reference_is_fatal() {
        let doc = doc(SCHEMAS);
        let mut resolver = Resolver::new(&doc);
        assert_eq!(
            resolver.reference("#/components/schemas/Missing"),
            Err(ResolveError::UnresolvedRef {
                pointer: "#/components/schemas/Missing".into()
            })
        );
    }

    #[test]
    fn composition_is_fatal() {
        let doc = doc(SCHEMAS);
        let mut resolver = Resolver::new(&doc);
        assert!(matches!(
            resolver.reference("#/components/schemas/Mixed"),
            Err(ResolveError::UnsupportedComposition { .. })
        ));
    }

    #[test]
    fn unsupported_type_is_fatal() {
        let doc = doc(SCHEMAS);
        let mut resolver = Resolver::new(&doc);
        assert_eq!(
            resolver.reference("#/components/schemas/Weird"),
            Err(ResolveError::UnsupportedType {
                schema_type: "tuple".into(),
                context: "Weird".into(),
            })
        );
    }

    #[test]
    fn binary_string_is_file_upload() {
        let doc = OpenApiDocument::from_json_str(
            r#"{"components":{"schemas":{"Photo":{"type":"string","format":"binary"}}}}"#,
        )
        .unwrap();
        let mut resolver = Resolver::new(&doc);
        let schema = &doc.components.schemas["Photo"];
        assert_eq!(resolver.type_of(schema, "Photo").unwrap(), TypeDescriptor::FileUpload);
    }

    #[test]
    fn missing_param_schema_is_string() {
        let doc = doc(SCHEMAS);
        let mut resolver = Resolver::new(&doc);
        assert_eq!(resolver.primitive_of(None, "limit"), Ok(Some(Primitive::String)));
    }
}
