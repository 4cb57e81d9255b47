// Parse-or-default helpers for JSON-encoded analytical columns.

use crate::domain::entities::feed::empty_object;
use serde_json::Value;

/// Decode a JSON-encoded object column. Absence, parse failure, or a
/// non-object value all yield an empty object.
pub fn parse_object(raw: Option<&str>) -> Value {
    match raw.map(serde_json::from_str::<Value>) {
        Some(Ok(value @ Value::Object(_))) => value,
        _ => empty_object(),
    }
}

/// Decode a JSON-encoded string-array column. Anything other than an array
/// of strings yields an empty vec; non-string elements are skipped.
pub fn parse_string_array(raw: Option<&str>) -> Vec<String> {
    match raw.map(serde_json::from_str::<Value>) {
        Some(Ok(Value::Array(items))) => items
            .into_iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}
