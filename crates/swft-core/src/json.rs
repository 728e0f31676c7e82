//! Path getters over `serde_json::Value`.
//!
//! Every nested-field lookup in the parsers goes through these primitives.
//! An absent segment, a non-object intermediate, or a type mismatch at the
//! leaf all resolve to "absent" (`None` or an empty slice); nothing is coerced.

use serde_json::{Map, Value};

use crate::errors::FormatError;

/// Parse raw bytes into a JSON value.
pub fn parse_bytes(bytes: &[u8]) -> Result<Value, FormatError> {
    serde_json::from_slice(bytes).map_err(|e| FormatError::InvalidJson {
        message: e.to_string(),
    })
}

/// Walk `path` through nested objects.
pub fn get<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(value, |current, segment| current.as_object()?.get(*segment))
}

/// Non-empty string at `path`.
pub fn get_str<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    get(value, path)?.as_str().filter(|s| !s.is_empty())
}

/// Array at `path`, or an empty slice.
pub fn get_array<'a>(value: &'a Value, path: &[&str]) -> &'a [Value] {
    get(value, path)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Object at `path`.
pub fn get_object<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Map<String, Value>> {
    get(value, path)?.as_object()
}

/// True when the object at `value` carries `key`, whatever its type.
pub fn has_key(value: &Value, key: &str) -> bool {
    value.as_object().is_some_and(|o| o.contains_key(key))
}

/// First alias that resolves to a non-empty string.
pub fn first_str<'a>(value: &'a Value, aliases: &[&str]) -> Option<&'a str> {
    aliases.iter().find_map(|alias| get_str(value, &[alias]))
}
