//! Example-JSON inference
//!
//! Derives a schema from a plain JSON document by example: object shape
//! is the union of observed field names, array item shape is the deep
//! merge of sampled element shapes. A field's explicit `null` in one
//! sample never erases a non-null shape inferred from another sample,
//! and array-valued fields contribute all their elements to the merged
//! item shape.

use serde_json::{json, Map, Value};

/// Infer a schema node from an example document.
pub fn infer_schema(example: &Value) -> Value {
    match example {
        Value::Null => json!({"type": "null"}),
        Value::Bool(_) => json!({"type": "boolean"}),
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                json!({"type": "integer"})
            } else {
                json!({"type": "number"})
            }
        }
        Value::String(_) => json!({"type": "string"}),
        Value::Array(items) => {
            let mut merged: Option<Value> = None;
            for item in items {
                let inferred = infer_schema(item);
                merged = Some(match merged {
                    None => inferred,
                    Some(previous) => merge_shapes(&previous, &inferred),
                });
            }
            match merged {
                Some(items) => json!({"type": "array", "items": items}),
                None => json!({"type": "array"}),
            }
        }
        Value::Object(fields) => {
            let mut properties = Map::with_capacity(fields.len());
            for (name, value) in fields {
                properties.insert(name.clone(), infer_schema(value));
            }
            json!({"type": "object", "properties": Value::Object(properties)})
        }
    }
}

/// Deep-merge two inferred shapes into the union shape.
pub fn merge_shapes(a: &Value, b: &Value) -> Value {
    if a == b {
        return a.clone();
    }

    // An explicit null in one sample must not erase a non-null shape
    // already inferred from another.
    if is_null_shape(a) {
        return b.clone();
    }
    if is_null_shape(b) {
        return a.clone();
    }

    let type_a = a.get("type").and_then(Value::as_str);
    let type_b = b.get("type").and_then(Value::as_str);

    match (type_a, type_b) {
        (Some("object"), Some("object")) => {
            let empty = Map::new();
            let props_a = a.get("properties").and_then(Value::as_object).unwrap_or(&empty);
            let props_b = b.get("properties").and_then(Value::as_object).unwrap_or(&empty);

            let mut merged = Map::with_capacity(props_a.len() + props_b.len());
            for (name, shape_a) in props_a {
                let shape = match props_b.get(name) {
                    Some(shape_b) => merge_shapes(shape_a, shape_b),
                    None => shape_a.clone(),
                };
                merged.insert(name.clone(), shape);
            }
            for (name, shape_b) in props_b {
                if !merged.contains_key(name) {
                    merged.insert(name.clone(), shape_b.clone());
                }
            }
            json!({"type": "object", "properties": Value::Object(merged)})
        }
        (Some("array"), Some("array")) => {
            // Sampled arrays are concatenated: their element shapes merge
            // into one item shape.
            match (a.get("items"), b.get("items")) {
                (Some(items_a), Some(items_b)) => {
                    json!({"type": "array", "items": merge_shapes(items_a, items_b)})
                }
                (Some(items), None) | (None, Some(items)) => {
                    json!({"type": "array", "items": items.clone()})
                }
                (None, None) => json!({"type": "array"}),
            }
        }
        (Some("integer"), Some("number")) | (Some("number"), Some("integer")) => {
            json!({"type": "number"})
        }
        (Some(ta), Some(tb)) if ta == tb => a.clone(),
        // Irreconcilable shapes fall back to the open representation
        _ => json!({}),
    }
}

fn is_null_shape(shape: &Value) -> bool {
    shape.get("type").and_then(Value::as_str) == Some("null")
}
