//! JSON payload decoding.
//!
//! # Design
//! Bodies are first read into a `serde_json::Value`, keys are optionally
//! rewritten, and only then is the target type deserialized. Payload types
//! decoded with [`KeyDecoding::ConvertFromSnakeCase`] declare their fields
//! in camelCase on the wire (`#[serde(rename_all = "camelCase")]`), so a
//! server sending `total_items` fills a field named `totalItems`.

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

/// How object keys in a response body are treated before decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyDecoding {
    /// Keys are used as they are.
    UseDefaultKeys,
    /// `snake_case` keys become `camelCase`, recursively.
    #[default]
    ConvertFromSnakeCase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeErrorKind {
    KeyNotFound,
    ValueNotFound,
    TypeMismatch,
    DataCorrupted,
    Other,
}

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DecodeErrorKind::KeyNotFound => "key not found",
            DecodeErrorKind::ValueNotFound => "value not found",
            DecodeErrorKind::TypeMismatch => "type mismatch",
            DecodeErrorKind::DataCorrupted => "data corrupted",
            DecodeErrorKind::Other => "decode error",
        };
        f.write_str(name)
    }
}

/// A body that could not be decoded into the requested type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {description}")]
pub struct DecodeError {
    pub kind: DecodeErrorKind,
    /// Missing key for `KeyNotFound`, `line:column` for corrupted data.
    pub path: Option<String>,
    pub description: String,
}

impl DecodeError {
    fn from_syntax(err: &serde_json::Error) -> Self {
        Self {
            kind: DecodeErrorKind::DataCorrupted,
            path: Some(format!("{}:{}", err.line(), err.column())),
            description: err.to_string(),
        }
    }

    fn from_data(err: &serde_json::Error) -> Self {
        let description = err.to_string();
        let (kind, path) = if let Some(field) = description
            .strip_prefix("missing field `")
            .and_then(|rest| rest.split('`').next())
        {
            (DecodeErrorKind::KeyNotFound, Some(field.to_string()))
        } else if description.starts_with("invalid type: null") {
            (DecodeErrorKind::ValueNotFound, None)
        } else if description.starts_with("invalid type")
            || description.starts_with("invalid value")
            || description.starts_with("invalid length")
        {
            (DecodeErrorKind::TypeMismatch, None)
        } else {
            (DecodeErrorKind::Other, None)
        };
        Self {
            kind,
            path,
            description,
        }
    }
}

/// Decode `bytes` as `T`, rewriting keys per `keys` first.
pub fn decode<T: DeserializeOwned>(bytes: &[u8], keys: KeyDecoding) -> Result<T, DecodeError> {
    let mut value: Value = serde_json::from_slice(bytes).map_err(|e| DecodeError::from_syntax(&e))?;
    if keys == KeyDecoding::ConvertFromSnakeCase {
        value = convert_keys(value);
    }
    serde_json::from_value(value).map_err(|e| DecodeError::from_data(&e))
}

/// Pull a top-level `message` string out of an error body, if there is one.
pub fn server_message(bytes: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(bytes).ok()?;
    value.get("message")?.as_str().map(str::to_string)
}

/// Parse `bytes` as a JSON object for diagnostics; `None` for anything else.
pub fn json_object(bytes: &[u8]) -> Option<Map<String, Value>> {
    match serde_json::from_slice(bytes) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn convert_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (snake_to_camel(&k), convert_keys(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(convert_keys).collect()),
        other => other,
    }
}

/// `one_two_three` → `oneTwoThree`. Leading and trailing underscores are
/// kept; a key without inner underscores is returned unchanged.
pub fn snake_to_camel(key: &str) -> String {
    let core = key.trim_matches('_');
    if core.is_empty() {
        return key.to_string();
    }
    let leading = &key[..key.len() - key.trim_start_matches('_').len()];
    let trailing = &key[key.trim_end_matches('_').len()..];

    let words: Vec<&str> = core.split('_').filter(|w| !w.is_empty()).collect();
    if words.len() == 1 && !core.contains('_') {
        return key.to_string();
    }

    let mut out = String::with_capacity(key.len());
    out.push_str(leading);
    for (i, word) in words.iter().enumerate() {
        if i == 0 {
            out.push_str(&word.to_lowercase());
        } else {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(&chars.as_str().to_lowercase());
            }
        }
    }
    out.push_str(trailing);
    out
}
