//! Primitive rule and format table
//!
//! Recognized scalar `type` values map per the generation configuration
//! (fixed-width vs arbitrary-precision numerics). For string-typed
//! nodes a `format` keyword may override the mapped representation
//! through the format table; user-configured overrides are consulted
//! before the built-in entries.

use std::sync::Arc;

use serde_json::Value;

use crate::builder::{PrimitiveKind, TypeRef};
use crate::config::{FloatRepr, IntegerRepr};
use crate::error::Result;
use crate::schema::Schema;

use super::RuleEngine;

impl RuleEngine<'_> {
    pub(crate) fn apply_primitive(&mut self, schema: &Arc<Schema>, scalar: &str) -> Result<TypeRef> {
        let ty = match scalar {
            "boolean" => TypeRef::Primitive(PrimitiveKind::Boolean),
            "null" => TypeRef::Primitive(PrimitiveKind::Null),
            "integer" => match self.config.numeric.integer {
                IntegerRepr::Int => TypeRef::Primitive(PrimitiveKind::Integer),
                IntegerRepr::Long => TypeRef::Primitive(PrimitiveKind::Long),
                IntegerRepr::BigInteger => TypeRef::Primitive(PrimitiveKind::BigInteger),
            },
            "number" => match self.config.numeric.float {
                FloatRepr::Double => TypeRef::Primitive(PrimitiveKind::Double),
                FloatRepr::BigDecimal => TypeRef::Primitive(PrimitiveKind::BigDecimal),
            },
            "string" => {
                let format = schema.content().get("format").and_then(Value::as_str);
                match format {
                    Some(format) => self
                        .format_type(format)
                        .unwrap_or(TypeRef::Primitive(PrimitiveKind::String)),
                    None => TypeRef::Primitive(PrimitiveKind::String),
                }
            }
            _ => TypeRef::Any,
        };
        Ok(ty)
    }

    /// Look up a `format` in the pluggable table: configured overrides
    /// first, then the built-in entries. Unknown formats fall back to
    /// the plain mapping.
    fn format_type(&self, format: &str) -> Option<TypeRef> {
        if let Some(name) = self.config.format_overrides.get(format) {
            return Some(TypeRef::Named(name.clone()));
        }
        match format {
            "date-time" => Some(TypeRef::Named(self.config.date_time.date_time_type.clone())),
            "date" => Some(TypeRef::Named(self.config.date_time.date_type.clone())),
            "time" => Some(TypeRef::Named(self.config.date_time.time_type.clone())),
            "uri" => Some(TypeRef::Named("Uri".to_string())),
            "uuid" => Some(TypeRef::Named("Uuid".to_string())),
            "email" => Some(TypeRef::Named("Email".to_string())),
            "hostname" => Some(TypeRef::Named("Hostname".to_string())),
            "ipv4" | "ipv6" => Some(TypeRef::Named("IpAddress".to_string())),
            "regex" => Some(TypeRef::Named("Pattern".to_string())),
            "int32" => Some(TypeRef::Primitive(PrimitiveKind::Integer)),
            "int64" => Some(TypeRef::Primitive(PrimitiveKind::Long)),
            "double" => Some(TypeRef::Primitive(PrimitiveKind::Double)),
            _ => None,
        }
    }
}
