//! Object rule
//!
//! Synthesizes a class declaration from an object-shaped node: one
//! field (plus accessors per the inclusion level) for each declared
//! property, inheritance via `extends`/`extendsType`, and an optional
//! map-typed member for `additionalProperties`.
//!
//! The type handle is assigned to the schema as soon as the declaration
//! shell exists, before any member is populated. That ordering is what
//! makes cyclic and self-referential schema graphs terminate.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;

use crate::builder::{AccessorDecl, AccessorKind, DeclKind, FieldDecl, ParentRef, PrimitiveKind, TypeRef};
use crate::error::{GeneratorError, Result};
use crate::schema::Schema;

use super::RuleEngine;

impl RuleEngine<'_> {
    pub(crate) fn apply_object(
        &mut self,
        node_name: &str,
        schema: &Arc<Schema>,
        namespace: &str,
    ) -> Result<TypeRef> {
        if let Some(existing) = schema.resolved_type() {
            return Ok(TypeRef::Declared(existing));
        }
        if let Some(cached) = self.reusable(schema) {
            return Ok(TypeRef::Declared(schema.set_type_if_empty(cached)));
        }

        let content = schema.content().clone();

        // Parent type resolves first, then the subtype declares.
        let parent = self.resolve_parent(node_name, schema, &content, namespace)?;

        let candidate = self
            .naming
            .type_name(node_name, &content, self.config.use_title_as_name);
        let declared = self.declare_unique(namespace, &candidate, DeclKind::Class)?;

        // Assign before members: cycles back into this schema must find
        // the handle already in place.
        let handle = schema.set_type_if_empty(declared);
        self.record_reuse(schema, handle);

        if let Some(parent) = parent {
            self.builder.set_parent(handle, parent)?;
        }

        let annotator = self.annotator;
        annotator.annotate_type(&mut *self.builder, handle, &content)?;

        let required: HashSet<&str> = content
            .get("required")
            .and_then(Value::as_array)
            .map(|list| list.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let mut used_identifiers: HashSet<String> = HashSet::new();

        if let Some(properties) = content.get("properties").and_then(Value::as_object) {
            for (property, property_content) in properties {
                let child = self
                    .registry
                    .create_property(schema, property, self.delimiters())?;
                let ty = self.apply(property, &child, namespace)?;

                let identifier = {
                    let derived = self.naming.field_identifier(property);
                    self.naming
                        .make_unique(&derived, |n| used_identifiers.contains(n))
                };
                used_identifiers.insert(identifier.clone());

                let field = FieldDecl {
                    name: identifier,
                    source_name: property.clone(),
                    ty,
                    required: required.contains(property.as_str()),
                    default: property_content.get("default").cloned(),
                };
                self.builder.add_field(handle, field.clone())?;
                annotator.annotate_property(&mut *self.builder, handle, &field, property_content)?;

                self.add_accessors(handle, property, &field)?;
            }
        }

        if self.config.include_additional_properties {
            if let Some(additional) = content.get("additionalProperties") {
                if additional.is_object() {
                    let child = self.registry.create_nested(
                        schema,
                        "additionalProperties",
                        self.delimiters(),
                    )?;
                    let value_ty =
                        self.apply(&format!("{node_name} property"), &child, namespace)?;
                    let field = FieldDecl {
                        name: self.naming.field_identifier("additional properties"),
                        source_name: "additionalProperties".to_string(),
                        ty: TypeRef::Map(Box::new(value_ty)),
                        required: false,
                        default: None,
                    };
                    self.builder.add_field(handle, field)?;
                }
            }
        }

        Ok(TypeRef::Declared(handle))
    }

    /// Resolve the inheritance position, if any.
    ///
    /// `extends` (a parent subschema) and `extendsType` (an
    /// externally-named parent) are mutually exclusive; declaring both
    /// is a fatal conflict.
    fn resolve_parent(
        &mut self,
        node_name: &str,
        schema: &Arc<Schema>,
        content: &Value,
        namespace: &str,
    ) -> Result<Option<ParentRef>> {
        let extends = content.get("extends");
        let extends_type = content.get("extendsType").and_then(Value::as_str);

        match (extends, extends_type) {
            (Some(_), Some(_)) => Err(GeneratorError::conflict(
                schema.document(),
                "declares both 'extends' and 'extendsType'; the parent type is ambiguous",
            )),
            (Some(_), None) => {
                let parent_schema =
                    self.registry
                        .create_nested(schema, "extends", self.delimiters())?;
                match self.apply(&format!("{node_name} parent"), &parent_schema, namespace)? {
                    TypeRef::Declared(handle) => Ok(Some(ParentRef::Declared(handle))),
                    TypeRef::Named(name) => Ok(Some(ParentRef::Named(name))),
                    _ => Err(GeneratorError::conflict(
                        schema.document(),
                        "'extends' must resolve to a declarable type",
                    )),
                }
            }
            (None, Some(name)) => Ok(Some(ParentRef::Named(name.to_string()))),
            (None, None) => Ok(None),
        }
    }

    fn add_accessors(
        &mut self,
        handle: crate::builder::TypeHandle,
        property: &str,
        field: &FieldDecl,
    ) -> Result<()> {
        let inclusion = self.config.inclusion;
        let annotator = self.annotator;
        let boolean = matches!(field.ty, TypeRef::Primitive(PrimitiveKind::Boolean));

        let mut push = |engine: &mut Self, kind: AccessorKind, name: String| -> Result<()> {
            let accessor = AccessorDecl {
                name,
                kind,
                field: field.name.clone(),
            };
            engine.builder.add_accessor(handle, accessor.clone())?;
            annotator.annotate_accessor(&mut *engine.builder, handle, &accessor, field)
        };

        if inclusion.getters() {
            let name = self.naming.getter_name(property, boolean);
            push(self, AccessorKind::Getter, name)?;
        }
        if inclusion.setters() {
            let name = self.naming.setter_name(property);
            push(self, AccessorKind::Setter, name)?;
        }
        if inclusion.builders() {
            let name = self.naming.builder_name(property);
            push(self, AccessorKind::Builder, name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::RuleEngine;
    use crate::annotate::NoopAnnotator;
    use crate::builder::{DeclKind, InMemoryTypeBuilder, ParentRef, TypeBuilder, TypeRef};
    use crate::config::{GenerationConfig, InclusionLevel};
    use crate::error::GeneratorError;
    use crate::registry::SchemaRegistry;
    use crate::schema::Schema;
    use serde_json::json;

    fn generate(content: serde_json::Value, config: &GenerationConfig) -> InMemoryTypeBuilder {
        let registry = SchemaRegistry::new();
        let mut builder = InMemoryTypeBuilder::new();
        let annotator = NoopAnnotator;
        let mut engine = RuleEngine::new(&registry, &mut builder, &annotator, config);
        let root = Schema::root(None, content);
        engine.apply("root", &root, "").unwrap();
        builder
    }

    #[test]
    fn test_object_declares_fields_in_source_order() {
        let builder = generate(
            json!({
                "type": "object",
                "properties": {
                    "zebra": {"type": "string"},
                    "alpha": {"type": "integer"}
                }
            }),
            &GenerationConfig::default(),
        );
        let decl = &builder.declarations()[0];
        assert_eq!(decl.name, "Root");
        assert_eq!(decl.kind, DeclKind::Class);
        let names: Vec<&str> = decl.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["zebra", "alpha"]);
    }

    #[test]
    fn test_required_marks_fields() {
        let builder = generate(
            json!({
                "type": "object",
                "properties": {"a": {"type": "string"}, "b": {"type": "string"}},
                "required": ["a"]
            }),
            &GenerationConfig::default(),
        );
        let decl = &builder.declarations()[0];
        assert!(decl.fields[0].required);
        assert!(!decl.fields[1].required);
    }

    #[test]
    fn test_inclusion_level_controls_accessors() {
        let mut config = GenerationConfig::default();
        config.inclusion = InclusionLevel::Fields;
        let builder = generate(
            json!({"type": "object", "properties": {"a": {"type": "string"}}}),
            &config,
        );
        assert!(builder.declarations()[0].accessors.is_empty());

        config.inclusion = InclusionLevel::Builders;
        let builder = generate(
            json!({"type": "object", "properties": {"a": {"type": "string"}}}),
            &config,
        );
        assert_eq!(builder.declarations()[0].accessors.len(), 3);
    }

    #[test]
    fn test_nested_object_declares_subtype() {
        let builder = generate(
            json!({
                "type": "object",
                "properties": {
                    "address": {
                        "type": "object",
                        "properties": {"street": {"type": "string"}}
                    }
                }
            }),
            &GenerationConfig::default(),
        );
        assert_eq!(builder.len(), 2);
        let root = &builder.declarations()[0];
        let address = builder.lookup_type("", "Address").unwrap();
        assert_eq!(root.fields[0].ty, TypeRef::Declared(address));
    }

    #[test]
    fn test_sibling_properties_with_same_shape_dedup() {
        let builder = generate(
            json!({
                "type": "object",
                "properties": {
                    "home": {"type": "object", "properties": {"street": {"type": "string"}}},
                    "work": {"type": "object", "properties": {"street": {"type": "string"}}}
                }
            }),
            &GenerationConfig::default(),
        );
        // Identical content shares one declaration through the reuse cache.
        assert_eq!(builder.len(), 2);
        let root = &builder.declarations()[0];
        assert_eq!(root.fields[0].ty, root.fields[1].ty);
    }

    #[test]
    fn test_sibling_properties_stay_distinct_without_dedup() {
        let mut config = GenerationConfig::default();
        config.structural_dedup = false;
        let builder = generate(
            json!({
                "type": "object",
                "properties": {
                    "home": {"type": "object", "properties": {"street": {"type": "string"}}},
                    "work": {"type": "object", "properties": {"street": {"type": "string"}}}
                }
            }),
            &config,
        );
        assert_eq!(builder.len(), 3);
    }

    #[test]
    fn test_self_reference_terminates_and_reuses_handle() {
        let builder = generate(
            json!({
                "type": "object",
                "properties": {
                    "name": {"type": "string"},
                    "friend": {"$ref": "#"}
                }
            }),
            &GenerationConfig::default(),
        );
        assert_eq!(builder.len(), 1);
        let decl = &builder.declarations()[0];
        let own_handle = builder.lookup_type("", "Root").unwrap();
        assert_eq!(decl.fields[1].ty, TypeRef::Declared(own_handle));
    }

    #[test]
    fn test_extends_and_extends_type_conflict() {
        let registry = SchemaRegistry::new();
        let mut builder = InMemoryTypeBuilder::new();
        let annotator = NoopAnnotator;
        let config = GenerationConfig::default();
        let mut engine = RuleEngine::new(&registry, &mut builder, &annotator, &config);
        let root = Schema::root(
            None,
            json!({
                "type": "object",
                "extends": {"type": "object", "properties": {}},
                "extendsType": "com.example.Base"
            }),
        );
        let err = engine.apply("root", &root, "").unwrap_err();
        assert!(matches!(err, GeneratorError::SchemaConflict { .. }));
    }

    #[test]
    fn test_extends_generates_parent_first() {
        let builder = generate(
            json!({
                "type": "object",
                "extends": {
                    "type": "object",
                    "typeName": "Base",
                    "properties": {"id": {"type": "integer"}}
                },
                "properties": {"name": {"type": "string"}}
            }),
            &GenerationConfig::default(),
        );
        assert_eq!(builder.declarations()[0].name, "Base");
        let child = &builder.declarations()[1];
        let base = builder.lookup_type("", "Base").unwrap();
        assert_eq!(child.parent, Some(ParentRef::Declared(base)));
    }

    #[test]
    fn test_external_parent_type() {
        let builder = generate(
            json!({
                "type": "object",
                "extendsType": "com.example.Base",
                "properties": {}
            }),
            &GenerationConfig::default(),
        );
        assert_eq!(
            builder.declarations()[0].parent,
            Some(ParentRef::Named("com.example.Base".to_string()))
        );
    }

    #[test]
    fn test_additional_properties_map_member() {
        let builder = generate(
            json!({
                "type": "object",
                "properties": {"a": {"type": "string"}},
                "additionalProperties": {"type": "integer"}
            }),
            &GenerationConfig::default(),
        );
        let decl = &builder.declarations()[0];
        let extra = decl.fields.iter().find(|f| f.source_name == "additionalProperties");
        assert!(extra.is_some());
        assert!(matches!(extra.unwrap().ty, TypeRef::Map(_)));
    }

    #[test]
    fn test_colliding_sanitized_property_names_stay_distinct() {
        let builder = generate(
            json!({
                "type": "object",
                "properties": {
                    "first name": {"type": "string"},
                    "first_name": {"type": "string"}
                }
            }),
            &GenerationConfig::default(),
        );
        let decl = &builder.declarations()[0];
        let names: Vec<&str> = decl.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["firstName", "firstName__1"]);
    }
}
