//! Per-field fallbacks for transcript payloads.
//!
//! Each helper is meant for `#[serde(deserialize_with = ...)]` on a single
//! field, so a `null` or mistyped value only resets that field.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

/// Deserialize `value`, falling back to the default when its shape is off.
pub(crate) fn from_value<T: DeserializeOwned + Default>(value: &Value, what: &str) -> T {
    if value.is_null() {
        return T::default();
    }
    T::deserialize(value).unwrap_or_else(|e| {
        warn!(error = %e, "Ignoring malformed {what}");
        T::default()
    })
}

pub(crate) fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(from_value(&value, std::any::type_name::<T>()))
}

/// Strings as-is, other scalars as their JSON text, anything else empty.
pub(crate) fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        scalar @ (Value::Bool(_) | Value::Number(_)) => scalar.to_string(),
        other => {
            warn!(value = %other, "Ignoring non-scalar text field");
            String::new()
        }
    })
}

/// Token and tool counts. Floats are truncated; negatives and junk become 0.
pub(crate) fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match &value {
        Value::Null => 0,
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64))
            .unwrap_or(0),
        other => {
            warn!(value = %other, "Ignoring non-numeric count");
            0
        }
    })
}

pub(crate) fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(is_truthy(&Value::deserialize(deserializer)?))
}

/// Integral exit codes only; anything else reads as a failed run (-1).
pub(crate) fn exit_code<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value.as_f64() {
        Some(code) if code.fract() == 0.0 => code as i64,
        _ => -1,
    })
}

/// Array items that decode; the rest are skipped with a warning.
pub(crate) fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        other => {
            warn!(value = %other, "Expected a list");
            return Ok(Vec::new());
        }
    };

    Ok(items
        .iter()
        .filter_map(|item| match T::deserialize(item) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!(error = %e, "Skipping malformed list item");
                None
            }
        })
        .collect())
}

pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(m) => !m.is_empty(),
    }
}
