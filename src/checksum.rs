//! Content digests for structural deduplication
//!
//! Two schema locations with identical content may share a generated type;
//! the digest over canonically serialized content is the key that makes
//! that sharing safe.

use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fmt;

/// SHA256 digest over canonically serialized schema content
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Checksum(String);

impl Checksum {
    /// Compute the digest of a JSON value.
    ///
    /// Object keys are sorted recursively before serialization so that two
    /// documents differing only in member order produce the same digest.
    pub fn of_value(value: &Value) -> Self {
        let canonical = canonicalize(value);
        let serialized = canonical.to_string();
        let hash = Sha256::digest(serialized.as_bytes());
        Self(format!("{:x}", hash))
    }

    /// Get the hex string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight hex characters, for log lines
    pub fn short(&self) -> &str {
        &self.0[..8]
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rebuild a value with object keys in sorted order, recursively.
fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let mut sorted = serde_json::Map::with_capacity(entries.len());
            for (key, val) in entries {
                sorted.insert(key.clone(), canonicalize(val));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_checksum_consistency() {
        let value = json!({"name": "test", "type": "object"});
        let checksum1 = Checksum::of_value(&value);
        let checksum2 = Checksum::of_value(&value);
        assert_eq!(checksum1, checksum2);
    }

    #[test]
    fn test_checksum_ignores_member_order() {
        let a: Value = serde_json::from_str(r#"{"b": 1, "a": {"y": 2, "x": 3}}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"a": {"x": 3, "y": 2}, "b": 1}"#).unwrap();
        assert_eq!(Checksum::of_value(&a), Checksum::of_value(&b));
    }

    #[test]
    fn test_checksum_different_content() {
        let a = json!({"type": "string"});
        let b = json!({"type": "integer"});
        assert_ne!(Checksum::of_value(&a), Checksum::of_value(&b));
    }

    #[test]
    fn test_short_form() {
        let checksum = Checksum::of_value(&json!({}));
        assert_eq!(checksum.short().len(), 8);
        assert!(checksum.as_str().starts_with(checksum.short()));
    }
}
