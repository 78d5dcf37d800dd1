//! Array rule
//!
//! `uniqueItems: true` maps to a set-like container, anything else to an
//! ordered list. The item type recurses on the `items` subschema; an
//! absent `items` leaves the element type open.

use std::sync::Arc;

use serde_json::Value;

use crate::builder::TypeRef;
use crate::error::Result;
use crate::schema::Schema;

use super::RuleEngine;

impl RuleEngine<'_> {
    pub(crate) fn apply_array(
        &mut self,
        node_name: &str,
        schema: &Arc<Schema>,
        namespace: &str,
    ) -> Result<TypeRef> {
        let unique = schema
            .content()
            .get("uniqueItems")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let item_ty = if schema.content().get("items").is_some() {
            let child = self
                .registry
                .create_nested(schema, "items", self.delimiters())?;
            self.apply(node_name, &child, namespace)?
        } else {
            TypeRef::Any
        };

        Ok(if unique {
            TypeRef::Set(Box::new(item_ty))
        } else {
            TypeRef::List(Box::new(item_ty))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::RuleEngine;
    use crate::annotate::NoopAnnotator;
    use crate::builder::{InMemoryTypeBuilder, PrimitiveKind, TypeRef};
    use crate::config::GenerationConfig;
    use crate::registry::SchemaRegistry;
    use crate::schema::Schema;
    use serde_json::json;

    fn apply(content: serde_json::Value) -> TypeRef {
        let registry = SchemaRegistry::new();
        let mut builder = InMemoryTypeBuilder::new();
        let annotator = NoopAnnotator;
        let config = GenerationConfig::default();
        let mut engine = RuleEngine::new(&registry, &mut builder, &annotator, &config);
        let root = Schema::root(None, content);
        engine.apply("items", &root, "").unwrap()
    }

    #[test]
    fn test_plain_array_is_list() {
        let ty = apply(json!({"type": "array", "items": {"type": "string"}}));
        assert_eq!(
            ty,
            TypeRef::List(Box::new(TypeRef::Primitive(PrimitiveKind::String)))
        );
    }

    #[test]
    fn test_unique_items_is_set() {
        let ty = apply(json!({"type": "array", "uniqueItems": true, "items": {"type": "integer"}}));
        assert_eq!(
            ty,
            TypeRef::Set(Box::new(TypeRef::Primitive(PrimitiveKind::Integer)))
        );
    }

    #[test]
    fn test_missing_items_is_open() {
        let ty = apply(json!({"type": "array"}));
        assert_eq!(ty, TypeRef::List(Box::new(TypeRef::Any)));
    }

    #[test]
    fn test_unique_items_false_is_list() {
        let ty = apply(json!({"type": "array", "uniqueItems": false}));
        assert!(matches!(ty, TypeRef::List(_)));
    }
}
