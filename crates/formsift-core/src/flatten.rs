//! Flattening of nested input records into ordered path/value pairs.
//!
//! Nested objects and arrays are walked depth-first and every scalar
//! leaf is emitted under a joined path, e.g. `{"a": {"b": 1}}` becomes
//! `a.b = 1` with the default separator. Array elements use their index
//! as a path segment. Emission order follows the input's own order, so
//! downstream maps keyed by path stay deterministic.

use serde_json::Value;

/// Flattens a nested input record into `(path, value)` pairs.
///
/// Only a top-level object produces entries; any other top-level value
/// flattens to nothing. Empty objects and arrays are leafless and are
/// dropped silently.
#[must_use]
pub fn flatten(data: &Value, separator: &str) -> Vec<(String, Value)> {
    let mut flat = Vec::new();
    if let Value::Object(map) = data {
        for (key, value) in map {
            descend(key.clone(), value, separator, &mut flat);
        }
    }
    flat
}

fn descend(path: String, value: &Value, separator: &str, out: &mut Vec<(String, Value)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                descend(format!("{path}{separator}{key}"), child, separator, out);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                descend(format!("{path}{separator}{index}"), child, separator, out);
            }
        }
        scalar => out.push((path, scalar.clone())),
    }
}
