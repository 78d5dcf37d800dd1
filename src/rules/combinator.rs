//! Combinator rule
//!
//! `oneOf`/`anyOf` synthesize a union wrapper declaration with one
//! variant per subschema. A combinator whose value is not an array is a
//! malformed structural combination and aborts the document.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;

use crate::builder::{DeclKind, FieldDecl, TypeRef};
use crate::error::{GeneratorError, Result};
use crate::schema::Schema;

use super::RuleEngine;

impl RuleEngine<'_> {
    pub(crate) fn apply_combinator(
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
        let keyword = if content.get("oneOf").is_some() {
            "oneOf"
        } else {
            "anyOf"
        };
        let subschemas = content
            .get(keyword)
            .and_then(Value::as_array)
            .ok_or_else(|| GeneratorError::UnsupportedConstruct {
                document: schema.document(),
                path: schema.id().unwrap_or("#").to_string(),
                reason: format!("'{keyword}' must be an array of subschemas"),
            })?;

        let candidate = self
            .naming
            .type_name(node_name, &content, self.config.use_title_as_name);
        let declared = self.declare_unique(namespace, &candidate, DeclKind::Union)?;
        let handle = schema.set_type_if_empty(declared);
        self.record_reuse(schema, handle);

        let annotator = self.annotator;
        annotator.annotate_type(&mut *self.builder, handle, &content)?;

        let mut used: HashSet<String> = HashSet::new();
        for (index, subschema) in subschemas.iter().enumerate() {
            let child =
                self.registry
                    .create_nested(schema, &format!("{keyword}/{index}"), self.delimiters())?;

            let variant_context = subschema
                .get("title")
                .and_then(Value::as_str)
                .map(|t| t.to_string())
                .unwrap_or_else(|| format!("{node_name} variant {index}"));
            let ty = self.apply(&variant_context, &child, namespace)?;

            let variant_name = {
                let derived = self.naming.field_identifier(&variant_context);
                self.naming.make_unique(&derived, |n| used.contains(n))
            };
            used.insert(variant_name.clone());

            let variant = FieldDecl {
                name: variant_name,
                source_name: format!("{keyword}/{index}"),
                ty,
                required: false,
                default: None,
            };
            self.builder.add_field(handle, variant.clone())?;
            annotator.annotate_property(&mut *self.builder, handle, &variant, subschema)?;
        }

        Ok(TypeRef::Declared(handle))
    }
}
