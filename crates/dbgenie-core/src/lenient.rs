//! Forgiving field decoders for payloads produced by the AI service.
//!
//! Suggested schemas come from a language model, so `null`, numbers-as-strings
//! and the odd wrong type are expected. Every decoder here falls back to the
//! field's default instead of rejecting the whole payload.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::column::{ColumnKind, DEFAULT_NULLABLE_CHANCE};

pub(crate) fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(value) => value,
        Value::Number(value) => value.to_string(),
        Value::Bool(value) => value.to_string(),
        _ => String::new(),
    })
}

pub(crate) fn optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = string(deserializer)?;
    Ok(if value.is_empty() { None } else { Some(value) })
}

pub(crate) fn boolean<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(value) => value,
        Value::Number(value) => value.as_f64().is_some_and(|n| n != 0.0),
        Value::String(value) => value.trim().eq_ignore_ascii_case("true"),
        _ => false,
    })
}

pub(crate) fn kind<'de, D>(deserializer: D) -> Result<ColumnKind, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(ColumnKind::parse(&string(deserializer)?))
}

pub(crate) fn chance<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Value::deserialize(deserializer)? {
        Value::Number(value) => value.as_f64(),
        Value::String(value) => value.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(raw.map(clamp_chance).unwrap_or(DEFAULT_NULLABLE_CHANCE))
}

/// Decode an array, silently skipping entries that do not fit `T`.
pub(crate) fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().filter_map(object_as).collect(),
        _ => Vec::new(),
    })
}

/// Decode an object into `T`; anything else (including `null`) is `None`.
pub(crate) fn object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(object_as(Value::deserialize(deserializer)?))
}

pub(crate) fn object_as<T: DeserializeOwned>(value: Value) -> Option<T> {
    if value.is_object() {
        serde_json::from_value(value).ok()
    } else {
        None
    }
}

pub(crate) fn clamp_chance(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}
