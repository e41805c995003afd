//! Conversion between plain JSON and Firestore typed values.
//!
//! Firestore's REST API wraps every field in a single-key object naming its
//! type (`{"stringValue": "x"}`, `{"integerValue": "42"}`, ...). Documents are
//! stored as plain JSON objects on our side, so conversion happens at the edge.

use journal_core::error::{JournalError, Result};
use serde_json::{Map, Number, Value};

const FORMAT: &str = "Firestore";

fn decode_error(message: impl Into<String>) -> JournalError {
    JournalError::Serialization {
        format: FORMAT.to_string(),
        message: message.into(),
    }
}

/// Wraps a plain JSON value in its Firestore typed representation.
pub fn to_typed_value(value: &Value) -> Value {
    let mut typed = Map::new();
    match value {
        Value::Null => {
            typed.insert("nullValue".into(), Value::Null);
        }
        Value::Bool(b) => {
            typed.insert("booleanValue".into(), Value::Bool(*b));
        }
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                // int64 travels as a decimal string.
                typed.insert("integerValue".into(), Value::String(i.to_string()));
            } else {
                let f = n.as_f64().unwrap_or_default();
                typed.insert("doubleValue".into(), Value::from(f));
            }
        }
        Value::String(s) => {
            typed.insert("stringValue".into(), Value::String(s.clone()));
        }
        Value::Array(items) => {
            let values = items.iter().map(to_typed_value).collect();
            let mut array = Map::new();
            array.insert("values".into(), Value::Array(values));
            typed.insert("arrayValue".into(), Value::Object(array));
        }
        Value::Object(fields) => {
            let mut map = Map::new();
            map.insert("fields".into(), Value::Object(to_typed_fields(fields)));
            typed.insert("mapValue".into(), Value::Object(map));
        }
    }
    Value::Object(typed)
}

/// Converts the fields of a plain JSON object into a Firestore `fields` map.
pub fn to_typed_fields(object: &Map<String, Value>) -> Map<String, Value> {
    object
        .iter()
        .map(|(key, value)| (key.clone(), to_typed_value(value)))
        .collect()
}

/// Unwraps a Firestore typed value into plain JSON.
pub fn from_typed_value(typed: &Value) -> Result<Value> {
    let object = typed
        .as_object()
        .ok_or_else(|| decode_error("typed value is not an object"))?;
    let (kind, inner) = object
        .iter()
        .next()
        .ok_or_else(|| decode_error("typed value has no type tag"))?;

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => inner
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| decode_error("booleanValue is not a bool")),
        "integerValue" => {
            let parsed = match inner {
                Value::String(s) => s.parse::<i64>().ok(),
                Value::Number(n) => n.as_i64(),
                _ => None,
            };
            parsed
                .map(Value::from)
                .ok_or_else(|| decode_error(format!("invalid integerValue: {}", inner)))
        }
        "doubleValue" => {
            let parsed = match inner {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.parse::<f64>().ok(),
                _ => None,
            };
            parsed
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| decode_error(format!("invalid doubleValue: {}", inner)))
        }
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner
            .as_str()
            .map(|s| Value::String(s.to_string()))
            .ok_or_else(|| decode_error(format!("{} is not a string", kind))),
        "arrayValue" => {
            let values = match inner.get("values") {
                Some(Value::Array(values)) => values
                    .iter()
                    .map(from_typed_value)
                    .collect::<Result<Vec<_>>>()?,
                // Empty arrays come back without a `values` key.
                _ => Vec::new(),
            };
            Ok(Value::Array(values))
        }
        "mapValue" => match inner.get("fields") {
            Some(Value::Object(fields)) => Ok(Value::Object(from_typed_fields(fields)?)),
            _ => Ok(Value::Object(Map::new())),
        },
        other => Err(decode_error(format!("unsupported value type '{}'", other))),
    }
}

/// Converts a Firestore `fields` map into a plain JSON object.
pub fn from_typed_fields(fields: &Map<String, Value>) -> Result<Map<String, Value>> {
    fields
        .iter()
        .map(|(key, typed)| Ok((key.clone(), from_typed_value(typed)?)))
        .collect()
}
