//! Flattening of raw recognition responses into path -> leaf pairs.
//!
//! The response tree has no fixed schema, so the fallback scans work on a
//! flat view built once per request: every leaf keyed by its dot-joined
//! path (`document.inference.pages[0].prediction.total_amount.value`),
//! in document order.

use serde_json::Value;

/// One leaf of the flattened response tree.
#[derive(Debug, Clone, PartialEq)]
pub enum FlatLeaf {
    Text(String),
    Number(f64),
    Bool(bool),
    Null,
}

/// A path/leaf pair in document order.
#[derive(Debug, Clone)]
pub struct FlatEntry {
    /// Dot-joined path with `[i]` for sequence indices.
    pub path: String,
    pub leaf: FlatLeaf,
}

/// Flatten an arbitrary response tree into ordered path/leaf pairs.
pub fn flatten(tree: &Value) -> Vec<FlatEntry> {
    let mut entries = Vec::new();
    walk(tree, String::new(), &mut entries);
    entries
}

fn walk(value: &Value, path: String, out: &mut Vec<FlatEntry>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", path, key)
                };
                walk(child, child_path, out);
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                walk(child, format!("{}[{}]", path, i), out);
            }
        }
        Value::String(s) => out.push(FlatEntry {
            path,
            leaf: FlatLeaf::Text(s.clone()),
        }),
        Value::Number(n) => {
            // Integers outside f64 range are dropped rather than mangled.
            if let Some(f) = n.as_f64() {
                out.push(FlatEntry {
                    path,
                    leaf: FlatLeaf::Number(f),
                });
            }
        }
        Value::Bool(b) => out.push(FlatEntry {
            path,
            leaf: FlatLeaf::Bool(*b),
        }),
        Value::Null => out.push(FlatEntry {
            path,
            leaf: FlatLeaf::Null,
        }),
    }
}
