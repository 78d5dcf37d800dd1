//! Rule-based type synthesis
//!
//! Dispatches on schema shape to per-kind synthesis rules. An untyped
//! document carries its own tag: the presence of `$ref`, `enum`, a
//! combinator keyword, or a `type` value decides which rule applies.
//! Dispatch is a closed tagged union over node kind resolved through an
//! explicit match.
//!
//! The engine owns the per-run synthesis state: the naming policy, the
//! content-hash reuse cache, and the seams to the registry, the type
//! builder, and the annotator stack.

mod array;
mod combinator;
mod enumeration;
mod object;
mod primitive;
mod reference;

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::annotate::Annotator;
use crate::builder::{DeclKind, TypeBuilder, TypeHandle, TypeRef};
use crate::checksum::Checksum;
use crate::config::GenerationConfig;
use crate::error::Result;
use crate::naming::NamingPolicy;
use crate::registry::SchemaRegistry;
use crate::schema::Schema;

// =============================================================================
// Structural classification
// =============================================================================

/// Closed set of node kinds the engine dispatches over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaKind {
    /// Carries `$ref`
    Reference,
    /// Carries `enum`
    Enum,
    /// Carries `oneOf`/`anyOf`
    Combinator,
    /// `type: object`, or untyped with object structure keywords
    Object,
    /// `type: array`
    Array,
    /// A recognized scalar `type`
    Primitive(String),
    /// Unrecognized or absent `type`: open representation
    Any,
}

impl SchemaKind {
    /// Classify a schema node by structural inspection.
    pub fn classify(content: &Value) -> SchemaKind {
        let Some(object) = content.as_object() else {
            // Boolean schemas and malformed nodes have no structure to
            // synthesize from.
            return SchemaKind::Any;
        };

        if object.contains_key("$ref") {
            return SchemaKind::Reference;
        }
        if object.contains_key("enum") {
            return SchemaKind::Enum;
        }
        if object.contains_key("oneOf") || object.contains_key("anyOf") {
            return SchemaKind::Combinator;
        }

        match object.get("type").and_then(Value::as_str) {
            Some("object") => SchemaKind::Object,
            Some("array") => SchemaKind::Array,
            Some(scalar @ ("string" | "integer" | "number" | "boolean" | "null")) => {
                SchemaKind::Primitive(scalar.to_string())
            }
            Some(_) => SchemaKind::Any,
            None => {
                let structural = ["properties", "extends", "extendsType", "additionalProperties"];
                if structural.iter().any(|k| object.contains_key(*k)) {
                    SchemaKind::Object
                } else {
                    SchemaKind::Any
                }
            }
        }
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Per-run synthesis engine.
///
/// Consumes the registry, emits through the type builder, and invokes
/// the annotator stack at each hook point.
pub struct RuleEngine<'a> {
    pub(crate) registry: &'a SchemaRegistry,
    pub(crate) builder: &'a mut dyn TypeBuilder,
    pub(crate) annotator: &'a dyn Annotator,
    pub(crate) config: &'a GenerationConfig,
    pub(crate) naming: NamingPolicy,
    /// Content hash -> handle; distinct locations with identical content
    /// share one generated type
    pub(crate) reuse: HashMap<Checksum, TypeHandle>,
}

impl<'a> RuleEngine<'a> {
    pub fn new(
        registry: &'a SchemaRegistry,
        builder: &'a mut dyn TypeBuilder,
        annotator: &'a dyn Annotator,
        config: &'a GenerationConfig,
    ) -> Self {
        Self {
            registry,
            builder,
            annotator,
            config,
            naming: NamingPolicy::new(config.naming.clone()),
            reuse: HashMap::new(),
        }
    }

    /// Top-level rule: dispatch a schema node to its synthesis rule.
    ///
    /// `node_name` is the contextual name used when the node declares a
    /// type and carries no override of its own.
    pub fn apply(
        &mut self,
        node_name: &str,
        schema: &Arc<Schema>,
        namespace: &str,
    ) -> Result<TypeRef> {
        let kind = SchemaKind::classify(schema.content());
        debug!(node = node_name, ?kind, "dispatching schema node");

        match kind {
            SchemaKind::Reference => self.apply_reference(node_name, schema, namespace),
            SchemaKind::Enum => self.apply_enum(node_name, schema, namespace),
            SchemaKind::Combinator => self.apply_combinator(node_name, schema, namespace),
            SchemaKind::Object => self.apply_object(node_name, schema, namespace),
            SchemaKind::Array => self.apply_array(node_name, schema, namespace),
            SchemaKind::Primitive(scalar) => self.apply_primitive(schema, &scalar),
            SchemaKind::Any => Ok(TypeRef::Any),
        }
    }

    pub(crate) fn delimiters(&self) -> &str {
        &self.config.ref_fragment_delimiters
    }

    /// Declare a type under a collision-free name.
    ///
    /// Candidates are checked against the builder's namespace index; a
    /// conflict signaled by the builder anyway is fed back into the
    /// uniqueness policy and retried, never repeating a prior name.
    pub(crate) fn declare_unique(
        &mut self,
        namespace: &str,
        candidate: &str,
        kind: DeclKind,
    ) -> Result<TypeHandle> {
        let mut refused: Vec<String> = Vec::new();
        loop {
            let name = {
                let builder: &dyn TypeBuilder = &*self.builder;
                let refused = &refused;
                self.naming.make_unique(candidate, |n| {
                    refused.iter().any(|r| r == n) || builder.lookup_type(namespace, n).is_some()
                })
            };
            match self.builder.declare_type(namespace, &name, kind) {
                Ok(handle) => return Ok(handle),
                Err(crate::error::GeneratorError::SchemaConflict { .. }) => {
                    refused.push(name);
                }
                Err(other) => return Err(other),
            }
        }
    }

    /// Reuse-cache lookup keyed by content hash.
    pub(crate) fn reusable(&self, schema: &Schema) -> Option<TypeHandle> {
        if !self.config.structural_dedup {
            return None;
        }
        self.reuse.get(schema.content_hash()).copied()
    }

    /// Record a freshly declared handle in the reuse cache.
    pub(crate) fn record_reuse(&mut self, schema: &Schema, handle: TypeHandle) {
        if self.config.structural_dedup {
            self.reuse.insert(schema.content_hash().clone(), handle);
        }
    }
}

/// Contextual name for a `$ref` target, from its last path segment.
pub(crate) fn name_from_ref(reference: &str) -> Option<&str> {
    let tail = reference
        .rsplit(|c| c == '/' || c == '#' || c == '.')
        .find(|s| !s.is_empty() && *s != "json" && *s != "schema")?;
    Some(tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_reference_wins_over_type() {
        let kind = SchemaKind::classify(&json!({"$ref": "#/definitions/a", "type": "object"}));
        assert_eq!(kind, SchemaKind::Reference);
    }

    #[test]
    fn test_classify_enum_wins_over_type() {
        let kind = SchemaKind::classify(&json!({"enum": ["a"], "type": "string"}));
        assert_eq!(kind, SchemaKind::Enum);
    }

    #[test]
    fn test_classify_by_type_keyword() {
        assert_eq!(SchemaKind::classify(&json!({"type": "object"})), SchemaKind::Object);
        assert_eq!(SchemaKind::classify(&json!({"type": "array"})), SchemaKind::Array);
        assert_eq!(
            SchemaKind::classify(&json!({"type": "string"})),
            SchemaKind::Primitive("string".to_string())
        );
    }

    #[test]
    fn test_classify_untyped_object_structure() {
        assert_eq!(
            SchemaKind::classify(&json!({"properties": {"a": {}}})),
            SchemaKind::Object
        );
        assert_eq!(SchemaKind::classify(&json!({})), SchemaKind::Any);
        assert_eq!(SchemaKind::classify(&json!({"type": "exotic"})), SchemaKind::Any);
    }

    #[test]
    fn test_classify_non_object_node() {
        assert_eq!(SchemaKind::classify(&json!(true)), SchemaKind::Any);
        assert_eq!(SchemaKind::classify(&json!([1, 2])), SchemaKind::Any);
    }

    #[test]
    fn test_name_from_ref() {
        assert_eq!(name_from_ref("#/definitions/address"), Some("address"));
        assert_eq!(name_from_ref("enum.json"), Some("enum"));
        assert_eq!(name_from_ref("http://example.org/card.schema.json"), Some("card"));
        assert_eq!(name_from_ref("#"), None);
    }
}
