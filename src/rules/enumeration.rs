//! Enum rule
//!
//! Builds a closed set of named constants from a JSON array of literal
//! values. Each literal flows through the same identifier rules as
//! property names; two literals landing on the same constant name in
//! one declared type is a hard generation error, never a silent rename.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;

use crate::builder::{DeclKind, EnumConstantDecl, TypeRef};
use crate::error::{GeneratorError, Result};
use crate::schema::Schema;

use super::RuleEngine;

impl RuleEngine<'_> {
    pub(crate) fn apply_enum(
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
        let values = content
            .get("enum")
            .and_then(Value::as_array)
            .ok_or_else(|| GeneratorError::UnsupportedConstruct {
                document: schema.document(),
                path: schema.id().unwrap_or("#").to_string(),
                reason: "'enum' must be an array of literal values".to_string(),
            })?;

        let candidate = self
            .naming
            .type_name(node_name, &content, self.config.use_title_as_name);
        let declared = self.declare_unique(namespace, &candidate, DeclKind::Enum)?;
        let handle = schema.set_type_if_empty(declared);
        self.record_reuse(schema, handle);

        let annotator = self.annotator;
        annotator.annotate_type(&mut *self.builder, handle, &content)?;

        let mut seen: HashSet<String> = HashSet::new();
        for value in values {
            let name = self.naming.enum_constant(value);
            if !seen.insert(name.clone()) {
                return Err(GeneratorError::conflict(
                    schema.document(),
                    format!("duplicate enum member '{name}' (from literal {value})"),
                ));
            }
            let constant = EnumConstantDecl {
                name,
                value: value.clone(),
            };
            self.builder.add_enum_constant(handle, constant.clone())?;
            annotator.annotate_enum_constant(&mut *self.builder, handle, &constant)?;
        }

        Ok(TypeRef::Declared(handle))
    }
}
