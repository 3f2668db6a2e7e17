//! Schema validator
//!
//! Validates an arbitrary JSON value against an [`OutputShape`]. Matching is
//! purely structural: no coercion is performed (a numeric string is not a
//! number). Undeclared object fields are dropped from the returned value;
//! optional fields that are missing or `null` are omitted.

use super::error::SchemaError;
use super::shape::{OutputShape, StringFormat};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Validate `value` against `shape`, returning the normalized value
pub fn validate(value: &Value, shape: &OutputShape) -> Result<Value, SchemaError> {
    let mut path = String::from("$");
    validate_at(value, shape, &mut path)
}

/// Validate then deserialize into a typed value
pub fn validate_as<T: DeserializeOwned>(value: &Value, shape: &OutputShape) -> Result<T, SchemaError> {
    let normalized = validate(value, shape)?;
    serde_json::from_value(normalized).map_err(|e| SchemaError {
        path: "$".to_string(),
        expected: std::any::type_name::<T>().to_string(),
        actual: e.to_string(),
    })
}

/// Name of the JSON kind of a value, for error messages
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(path: &str, shape: &OutputShape, actual: impl Into<String>) -> SchemaError {
    SchemaError {
        path: path.to_string(),
        expected: shape.describe(),
        actual: actual.into(),
    }
}

fn validate_at(value: &Value, shape: &OutputShape, path: &mut String) -> Result<Value, SchemaError> {
    match shape {
        OutputShape::Any => Ok(value.clone()),

        OutputShape::String { allowed, format } => {
            let Value::String(s) = value else {
                return Err(mismatch(path, shape, kind_of(value)));
            };
            if let Some(values) = allowed
                && !values.iter().any(|v| v == s)
            {
                return Err(mismatch(path, shape, format!("\"{}\"", s)));
            }
            if let Some(StringFormat::Uri) = format
                && !is_uri(s)
            {
                return Err(mismatch(path, shape, format!("\"{}\"", s)));
            }
            Ok(value.clone())
        }

        OutputShape::Number { min, max, integer } => {
            let Some(n) = value.as_f64() else {
                return Err(mismatch(path, shape, kind_of(value)));
            };
            if *integer && !(value.is_i64() || value.is_u64() || n.fract() == 0.0) {
                return Err(mismatch(path, shape, n.to_string()));
            }
            let below = min.is_some_and(|lo| n < lo);
            let above = max.is_some_and(|hi| n > hi);
            if below || above {
                return Err(mismatch(path, shape, n.to_string()));
            }
            Ok(value.clone())
        }

        OutputShape::Boolean => match value {
            Value::Bool(_) => Ok(value.clone()),
            other => Err(mismatch(path, shape, kind_of(other))),
        },

        OutputShape::Array { items } => {
            let Value::Array(elements) = value else {
                return Err(mismatch(path, shape, kind_of(value)));
            };
            let mut out = Vec::with_capacity(elements.len());
            for (index, element) in elements.iter().enumerate() {
                let len = path.len();
                path.push_str(&format!("[{}]", index));
                let validated = validate_at(element, items, path);
                path.truncate(len);
                out.push(validated?);
            }
            Ok(Value::Array(out))
        }

        OutputShape::Object { fields } => {
            let Value::Object(map) = value else {
                return Err(mismatch(path, shape, kind_of(value)));
            };
            let mut out = Map::new();
            for field in fields {
                let len = path.len();
                path.push('.');
                path.push_str(&field.name);

                let result = match map.get(&field.name) {
                    None | Some(Value::Null) if !field.required => Ok(None),
                    None => Err(SchemaError {
                        path: path.clone(),
                        expected: field.shape.describe(),
                        actual: "missing".to_string(),
                    }),
                    Some(inner) => validate_at(inner, &field.shape, path).map(Some),
                };
                path.truncate(len);

                if let Some(validated) = result? {
                    out.insert(field.name.clone(), validated);
                }
            }
            Ok(Value::Object(out))
        }
    }
}

fn is_uri(s: &str) -> bool {
    url::Url::parse(s).is_ok()
}
