//! Schema-agnostic key lookup over upstream JSON.
//!
//! Upstream payloads (hebcal, OpenWeatherMap) are read as untyped
//! [`Value`] trees and searched by key, so field reordering or new nesting
//! levels upstream do not break the lookup.

use serde_json::Value;

/// Collect every leaf value stored under `key`, depth-first in document order.
///
/// Objects and arrays are always recursed into. A matching key whose value is
/// itself an object or array is recursed into rather than collected.
/// Duplicates are kept. Returns an empty vector when nothing matches.
pub fn extract_values<'a>(node: &'a Value, key: &str) -> Vec<&'a Value> {
    let mut out = Vec::new();
    walk(node, key, &mut out);
    out
}

/// Like [`extract_values`], keeping only the string-typed matches.
pub fn extract_strings<'a>(node: &'a Value, key: &str) -> Vec<&'a str> {
    extract_values(node, key)
        .into_iter()
        .filter_map(Value::as_str)
        .collect()
}

fn walk<'a>(node: &'a Value, key: &str, out: &mut Vec<&'a Value>) {
    match node {
        Value::Object(map) => {
            for (k, v) in map {
                if v.is_object() || v.is_array() {
                    walk(v, key, out);
                } else if k == key {
                    out.push(v);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                walk(item, key, out);
            }
        }
        _ => {}
    }
}
