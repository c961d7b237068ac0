//! Primary-collection decoding.
//!
//! List endpoints answer either with a bare array or with an object that
//! wraps the array under a resource-specific field.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

pub fn decode_collection<T: DeserializeOwned>(value: Value, field: &str) -> Result<Vec<T>, ApiError> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove(field) {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(ApiError::unexpected_shape(format!(
                    "field '{}' is {} instead of an array",
                    field,
                    kind(&other)
                )))
            }
            None => {
                return Err(ApiError::unexpected_shape(format!(
                    "object without a '{}' array",
                    field
                )))
            }
        },
        other => {
            return Err(ApiError::unexpected_shape(format!(
                "expected an array, got {}",
                kind(&other)
            )))
        }
    };

    items
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<Vec<T>, _>>()
        .map_err(ApiError::from)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
