//! Helpers for the JSON representation of domain objects.

use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::types::DbId;

/// Key holding the primary key in every domain JSON object.
pub const ID_KEY: &str = "id";

/// Read the `id` of a domain JSON object.
///
/// Clients send ids either as numbers or as numeric strings; `null`, a
/// missing key or a non-numeric value all yield `None`.
pub fn retrieve_long_id(json: &Value) -> Option<DbId> {
    match json.get(ID_KEY)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Borrow the object map of a JSON payload, rejecting any other JSON type.
pub fn as_object(json: &Value) -> Result<&Map<String, Value>, CoreError> {
    json.as_object()
        .ok_or_else(|| CoreError::Validation("JSON payload must be an object".to_string()))
}

/// Copy of `json` without its `id`, so the server generates a fresh one.
pub fn without_id(json: &Value) -> Result<Value, CoreError> {
    let mut map = as_object(json)?.clone();
    map.remove(ID_KEY);
    Ok(Value::Object(map))
}

/// Apply `patch` onto `base`: keys present in `patch` (including explicit
/// nulls) replace those of `base`. The `id` of `base` is always kept.
pub fn merge(base: &Value, patch: &Value) -> Result<Value, CoreError> {
    let mut merged = as_object(base)?.clone();
    for (key, value) in as_object(patch)? {
        if key != ID_KEY {
            merged.insert(key.clone(), value.clone());
        }
    }
    Ok(Value::Object(merged))
}
