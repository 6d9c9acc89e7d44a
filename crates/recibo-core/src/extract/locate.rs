//! Direct field location on raw recognition responses.
//!
//! Different model versions name the same field differently and nest the
//! prediction object at different depths, so lookup is driven by ordered
//! alias tables and a list of known prediction roots, with a recursive
//! key search over the whole tree as the last structured resort.

use regex::Regex;
use serde_json::Value;

use super::patterns::{FILENAME_LIKE, NUMERIC_ONLY};

/// Ordered key aliases for the supplier field.
pub const SUPPLIER_ALIASES: &[&str] = &[
    "supplier_name",
    "merchant_name",
    "company_name",
    "supplier",
    "merchant",
    "store_name",
];

/// Ordered key aliases for the purchase-date field.
pub const DATE_ALIASES: &[&str] = &["date", "purchase_date", "invoice_date"];

/// Ordered key aliases for the total-amount field.
pub const TOTAL_ALIASES: &[&str] = &[
    "total_amount",
    "amount_total",
    "total_ttc",
    "total",
    "total_incl_tax",
];

/// Collect the prediction objects found at the known nesting paths, in
/// lookup order.
pub fn prediction_roots(tree: &Value) -> Vec<&Value> {
    let candidates = [
        tree.get("prediction"),
        tree.get("document")
            .and_then(|d| d.get("inference"))
            .and_then(|i| i.get("prediction")),
        tree.get("inference").and_then(|i| i.get("prediction")),
        tree.get("document")
            .and_then(|d| d.get("inference"))
            .and_then(|i| i.get("pages"))
            .and_then(|p| p.get(0))
            .and_then(|p| p.get("prediction")),
        tree.get("inference")
            .and_then(|i| i.get("pages"))
            .and_then(|p| p.get(0))
            .and_then(|p| p.get("prediction")),
    ];

    candidates
        .into_iter()
        .flatten()
        .filter(|v| v.is_object())
        .collect()
}

/// Locate a raw field value: alias lookup on every known prediction object
/// first, then a case-insensitive key search across the whole tree.
pub fn locate(
    tree: &Value,
    roots: &[&Value],
    aliases: &[&str],
    key_pattern: &Regex,
) -> Option<String> {
    for root in roots {
        let Some(pred) = root.as_object() else {
            continue;
        };
        for alias in aliases {
            if let Some(text) = pred.get(*alias).and_then(unwrap_scalar).and_then(scalar_text) {
                return Some(text);
            }
        }
    }

    search_key(tree, key_pattern)
}

/// Unwrap a field value to a scalar.
///
/// Values arrive as plain scalars, as mappings carrying the scalar under a
/// `value`/`content`/`text` member, or as sequences of such mappings (the
/// first element wins).
pub fn unwrap_scalar(value: &Value) -> Option<&Value> {
    unwrap_depth(value, 0)
}

fn unwrap_depth(value: &Value, depth: usize) -> Option<&Value> {
    if depth > 4 {
        return None;
    }
    match value {
        Value::Object(map) => ["value", "content", "text"]
            .iter()
            .find_map(|k| map.get(*k))
            .and_then(|v| unwrap_depth(v, depth + 1)),
        Value::Array(items) => items.first().and_then(|v| unwrap_depth(v, depth + 1)),
        Value::Null => None,
        other => Some(other),
    }
}

/// A scalar's text form; empty strings and booleans are not usable values.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Depth-first search for the first key matching `pattern` that holds a
/// usable scalar value.
fn search_key(value: &Value, pattern: &Regex) -> Option<String> {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if pattern.is_match(key) {
                    if let Some(text) = unwrap_scalar(child).and_then(scalar_text) {
                        return Some(text);
                    }
                }
                if let Some(found) = search_key(child, pattern) {
                    return Some(found);
                }
            }
            None
        }
        Value::Array(items) => items.iter().find_map(|v| search_key(v, pattern)),
        _ => None,
    }
}

/// Whether a candidate supplier value survives the name filter: at least
/// two characters, not purely numeric, not a filename.
pub fn acceptable_supplier(name: &str) -> bool {
    let trimmed = name.trim();
    trimmed.chars().count() >= 2
        && !NUMERIC_ONLY.is_match(trimmed)
        && !FILENAME_LIKE.is_match(trimmed)
}
