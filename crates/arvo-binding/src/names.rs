//! Key normalization to canonical snake_case.
//!
//! Conversion follows [`heck::ToSnakeCase`]:
//! - `-` and other separators become a single `_`
//! - an uppercase letter after a lowercase letter or digit starts a new word
//! - in an acronym run, the last capital starts a new word when a lowercase
//!   letter follows (`HTTPServer` -> `http_server`)
//! - everything is lowercased
//!
//! Normalizing an already canonical key is a no-op.

use heck::ToSnakeCase;
use serde_json::{Map, Value};

/// Convert one key to canonical snake_case.
///
/// # Examples
///
/// ```
/// use arvo_binding::names::normalize_key;
///
/// assert_eq!(normalize_key("bazQux"), "baz_qux");
/// assert_eq!(normalize_key("baz-qux"), "baz_qux");
/// assert_eq!(normalize_key("baz_qux"), "baz_qux");
/// ```
pub fn normalize_key(key: &str) -> String {
    key.to_snake_case()
}

/// Returns `true` if `key` is already in canonical form.
pub fn is_canonical(key: &str) -> bool {
    normalize_key(key) == key
}

/// Normalize the keys of a map, recursing into nested maps and arrays.
///
/// Two raw keys that normalize to the same canonical key collapse into one
/// entry; which value survives is unspecified.
pub fn normalize_map(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .map(|(k, v)| (normalize_key(k), normalize_value(v)))
        .collect()
}

/// Normalize every map reachable from `value`.
pub fn normalize_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(normalize_map(map)),
        Value::Array(items) => Value::Array(items.iter().map(normalize_value).collect()),
        other => other.clone(),
    }
}
