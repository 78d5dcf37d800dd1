//! Reference rule
//!
//! Resolves a `$ref` through the registry. When the referenced schema
//! already carries a type handle the handle is returned directly, with
//! no recursion into its children and no new declaration. Together with
//! the object rule's declare-before-populate ordering this is what lets
//! cyclic reference chains terminate.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::builder::TypeRef;
use crate::error::{GeneratorError, Result};
use crate::schema::Schema;

use super::{name_from_ref, RuleEngine};

impl RuleEngine<'_> {
    pub(crate) fn apply_reference(
        &mut self,
        node_name: &str,
        schema: &Arc<Schema>,
        namespace: &str,
    ) -> Result<TypeRef> {
        let reference = schema
            .content()
            .get("$ref")
            .and_then(Value::as_str)
            .ok_or_else(|| GeneratorError::UnsupportedConstruct {
                document: schema.document(),
                path: schema.id().unwrap_or("#").to_string(),
                reason: "'$ref' must be a string".to_string(),
            })?
            .to_string();

        let target = self
            .registry
            .create_relative(schema, &reference, self.delimiters())?;

        if let Some(existing) = target.resolved_type() {
            debug!(reference = %reference, "reference target already generated");
            return Ok(TypeRef::Declared(existing));
        }

        let context = name_from_ref(&reference).unwrap_or(node_name);
        self.apply(context, &target, namespace)
    }
}
