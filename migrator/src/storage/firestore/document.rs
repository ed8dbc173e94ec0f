//! Decoding of Firestore REST value wrappers into plain JSON.
//!
//! The REST API wraps every field in a typed envelope, e.g.
//! `{"stringValue": "Widget"}` or `{"mapValue": {"fields": {...}}}`. The
//! rest of the migrator works on plain `serde_json::Value`s, so documents
//! are unwrapped once, right after fetching.

use serde_json::{Map, Value};

/// Unwrap one typed value envelope. Unknown envelope shapes decode to null.
pub fn decode_value(value: &Value) -> Value {
    let Some(wrapper) = value.as_object() else {
        return Value::Null;
    };

    if let Some(v) = wrapper.get("stringValue") {
        return v.clone();
    }
    if let Some(v) = wrapper.get("integerValue") {
        // Encoded as a decimal string to survive 64-bit precision.
        return v
            .as_str()
            .and_then(|s| s.parse::<i64>().ok())
            .map(Value::from)
            .unwrap_or(Value::Null);
    }
    if let Some(v) = wrapper.get("doubleValue") {
        return v.clone();
    }
    if let Some(v) = wrapper.get("booleanValue") {
        return v.clone();
    }
    if let Some(v) = wrapper.get("timestampValue") {
        // RFC 3339 string; the date normalization in the mappers parses it.
        return v.clone();
    }
    if wrapper.contains_key("nullValue") {
        return Value::Null;
    }
    if let Some(map_value) = wrapper.get("mapValue") {
        let mut out = Map::new();
        if let Some(fields) = map_value.get("fields").and_then(Value::as_object) {
            for (key, field) in fields {
                out.insert(key.clone(), decode_value(field));
            }
        }
        return Value::Object(out);
    }
    if let Some(array_value) = wrapper.get("arrayValue") {
        let values = array_value
            .get("values")
            .and_then(Value::as_array)
            .map(|values| values.iter().map(decode_value).collect())
            .unwrap_or_default();
        return Value::Array(values);
    }

    Value::Null
}

/// Unwrap every field of a document body.
pub fn decode_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(key, value)| (key.clone(), decode_value(value)))
        .collect()
}

/// Extract the document id from a full resource name, e.g.
/// `projects/p/databases/(default)/documents/users/abc123` -> `abc123`.
pub fn document_id(name: &str) -> String {
    name.rsplit('/').next().unwrap_or(name).to_string()
}
