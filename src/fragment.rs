//! Fragment resolution
//!
//! Pure, stateless walking of a pointer path within a parsed document.
//! Paths are split on any character of the configured delimiter set,
//! which supports both the pointer style (`#/a/b`) and the dotted
//! compatibility style (`#.a.b`).

use serde_json::Value;

use crate::error::{GeneratorError, Result};
use crate::token;

/// Resolve a pointer path within a parsed tree.
///
/// Each token is unescaped through the reference token codec before
/// lookup. Array nodes require the token to parse as a non-negative
/// integer index; object nodes require an existing field. `document`
/// only provides error context.
pub fn resolve<'a>(
    tree: &'a Value,
    path: &str,
    delimiters: &str,
    document: &str,
) -> Result<&'a Value> {
    let trimmed = path.strip_prefix('#').unwrap_or(path);

    let mut current = tree;
    for raw_token in trimmed
        .split(|c| delimiters.contains(c))
        .filter(|t| !t.is_empty())
    {
        let segment = token::decode(raw_token);
        current = step(current, &segment, path, document)?;
    }

    Ok(current)
}

/// Advance one segment from the current node.
fn step<'a>(node: &'a Value, segment: &str, path: &str, document: &str) -> Result<&'a Value> {
    match node {
        Value::Array(items) => {
            let index: usize = segment.parse().map_err(|_| {
                GeneratorError::resolution(
                    document,
                    path,
                    format!("'{segment}' is not a valid array index"),
                )
            })?;
            items.get(index).ok_or_else(|| {
                GeneratorError::resolution(
                    document,
                    path,
                    format!("array index {index} out of bounds ({} elements)", items.len()),
                )
            })
        }
        Value::Object(map) => map.get(segment).ok_or_else(|| {
            GeneratorError::resolution(document, path, format!("no such field '{segment}'"))
        }),
        other => Err(GeneratorError::resolution(
            document,
            path,
            format!(
                "cannot descend into {} node with segment '{segment}'",
                json_kind(other)
            ),
        )),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const DELIMITERS: &str = "/.";

    #[test]
    fn test_empty_path_returns_root() {
        let tree = json!({"a": 1});
        let resolved = resolve(&tree, "#", DELIMITERS, "doc").unwrap();
        assert_eq!(*resolved, tree);
    }

    #[test]
    fn test_nested_object_and_array_path() {
        let tree = json!({"a": {"z": [10, 20, 30]}});
        let resolved = resolve(&tree, "#/a/z/1", DELIMITERS, "doc").unwrap();
        assert_eq!(*resolved, json!(20));
    }

    #[test]
    fn test_dotted_style() {
        let tree = json!({"a": {"b": {"c": "deep"}}});
        let resolved = resolve(&tree, "#.a.b.c", DELIMITERS, "doc").unwrap();
        assert_eq!(*resolved, json!("deep"));
    }

    #[test]
    fn test_missing_segment_is_resolution_error() {
        let tree = json!({"a": {}});
        let err = resolve(&tree, "#/a/missing", DELIMITERS, "doc").unwrap_err();
        match err {
            GeneratorError::ReferenceResolution { path, reason, .. } => {
                assert_eq!(path, "#/a/missing");
                assert!(reason.contains("missing"));
            }
            other => panic!("expected ReferenceResolution, got {other:?}"),
        }
    }

    #[test]
    fn test_field_token_on_array_is_resolution_error() {
        let tree = json!({"a": [1, 2, 3]});
        let err = resolve(&tree, "#/a/first", DELIMITERS, "doc").unwrap_err();
        match err {
            GeneratorError::ReferenceResolution { reason, .. } => {
                assert!(reason.contains("not a valid array index"));
            }
            other => panic!("expected ReferenceResolution, got {other:?}"),
        }
    }

    #[test]
    fn test_escaped_segment_is_decoded_before_lookup() {
        let tree = json!({"properties": {"com/vsv#...": {"type": "string"}}});
        let path = format!("#/properties/{}", crate::token::encode("com/vsv#..."));
        let resolved = resolve(&tree, &path, DELIMITERS, "doc").unwrap();
        assert_eq!(*resolved, json!({"type": "string"}));
    }

    #[test]
    fn test_descend_into_scalar_fails() {
        let tree = json!({"a": 42});
        assert!(resolve(&tree, "#/a/b", DELIMITERS, "doc").is_err());
    }
}
