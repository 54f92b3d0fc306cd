// Example value model
//
// The synthesizer's output. Serializes as plain JSON (or YAML) so callers can
// print it directly.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::internal::error::{Error, Result};

/// A synthesized example value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExampleValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Vec<ExampleValue>),
    Object(IndexMap<String, ExampleValue>),
}

impl ExampleValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ExampleValue::Null)
    }

    /// Returns the entries if this is an object.
    pub fn as_object(&self) -> Option<&IndexMap<String, ExampleValue>> {
        match self {
            ExampleValue::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the elements if this is an array.
    pub fn as_array(&self) -> Option<&[ExampleValue]> {
        match self {
            ExampleValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the text if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ExampleValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl TryFrom<&Value> for ExampleValue {
    type Error = Error;

    /// Decodes a literal from the schema document (`example`, `default`, `enum` members).
    fn try_from(value: &Value) -> Result<Self> {
        Ok(match value {
            Value::Null => ExampleValue::Null,
            Value::Bool(b) => ExampleValue::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    ExampleValue::Integer(i)
                } else if n.is_u64() {
                    // Above i64::MAX: would silently lose precision as a float
                    return Err(Error::LiteralError(format!(
                        "Integer literal {} does not fit in a signed 64-bit integer",
                        n
                    )));
                } else {
                    let f = n.as_f64().ok_or_else(|| {
                        Error::LiteralError(format!("Number literal {} is not representable", n))
                    })?;
                    ExampleValue::Float(f)
                }
            }
            Value::String(s) => ExampleValue::String(s.clone()),
            Value::Array(items) => ExampleValue::Array(
                items
                    .iter()
                    .map(ExampleValue::try_from)
                    .collect::<Result<Vec<_>>>()?,
            ),
            Value::Object(map) => {
                let mut entries = IndexMap::with_capacity(map.len());
                for (key, item) in map {
                    entries.insert(key.clone(), ExampleValue::try_from(item)?);
                }
                ExampleValue::Object(entries)
            }
        })
    }
}

impl From<bool> for ExampleValue {
    fn from(b: bool) -> Self {
        ExampleValue::Bool(b)
    }
}

impl From<i64> for ExampleValue {
    fn from(i: i64) -> Self {
        ExampleValue::Integer(i)
    }
}

impl From<f64> for ExampleValue {
    fn from(f: f64) -> Self {
        ExampleValue::Float(f)
    }
}

impl From<&str> for ExampleValue {
    fn from(s: &str) -> Self {
        ExampleValue::String(s.to_string())
    }
}

impl From<String> for ExampleValue {
    fn from(s: String) -> Self {
        ExampleValue::String(s)
    }
}
