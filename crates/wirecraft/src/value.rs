//! Runtime values bound to schema fields.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// A value for one field, either synthesized by [crate::generate] or
/// supplied by the caller. Integers are kept wide enough to hold the full
/// unsigned 64-bit range next to the signed 64-bit minimum.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(i128),
    Float(f64),
    Text(String),
}

/// Field name to value bindings for one payload.
pub type ValueSet = BTreeMap<String, Value>;

impl Value {
    /// Converts a scalar JSON value, as found in externally supplied value
    /// files. Booleans, nulls and containers have no field representation
    /// and yield `None`.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Value::Int(i128::from(i)))
                } else if let Some(u) = n.as_u64() {
                    Some(Value::Int(i128::from(u)))
                } else {
                    n.as_f64().map(Value::Float)
                }
            }
            serde_json::Value::String(s) => Some(Value::Text(s.clone())),
            _ => None,
        }
    }

    /// Value class named in error messages.
    pub fn class(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}
