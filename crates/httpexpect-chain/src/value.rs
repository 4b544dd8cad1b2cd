//! Closed value tree consumed by assertions.
//!
//! Every input is canonicalized into [`Value`] before it is compared, so
//! assertions never have to reason about the concrete Rust type the caller
//! handed in. Numbers are always stored as `f64`: `1`, `1u8` and `1.0` are
//! the same value.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

/// A decoded value tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

/// Discriminant of a [`Value`], used in failure messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "boolean",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        };
        f.write_str(name)
    }
}

impl Value {
    /// Canonicalize any serializable input.
    ///
    /// Fails only when serialization itself fails, for example a map with
    /// non-string keys. Non-finite floats become [`Value::Null`], as in JSON.
    pub fn canonical<T: Serialize + ?Sized>(input: &T) -> Result<Self> {
        let json = serde_json::to_value(input).map_err(|e| Error::Canonicalize(e.to_string()))?;
        Ok(Self::from(json))
    }

    /// Parse a JSON document into a value tree.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        let json: serde_json::Value =
            serde_json::from_slice(bytes).map_err(|e| Error::Decode(e.to_string()))?;
        Ok(Self::from(json))
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    pub fn is_null(&self) -> bool { matches!(self, Value::Null) }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Returns `true` if every key of `subset` is present in `self` with a
    /// value that is itself a subset of the corresponding value.
    ///
    /// Arrays match when they have the same length and each element is a
    /// subset of the element at the same index. Scalars use equality.
    pub fn contains_subset(&self, subset: &Value) -> bool {
        match (self, subset) {
            (Value::Object(map), Value::Object(sub)) => sub.iter().all(|(key, expected)| {
                map.get(key)
                    .is_some_and(|actual| actual.contains_subset(expected))
            }),
            (Value::Array(items), Value::Array(sub)) => {
                items.len() == sub.len()
                    && items.iter().zip(sub).all(|(a, e)| a.contains_subset(e))
            }
            (actual, expected) => actual == expected,
        }
    }

    /// Convert back into a `serde_json` tree, e.g. for printing.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
            Value::Object(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            // `as_f64` is total for every number serde_json can hold
            // without `arbitrary_precision`.
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self { Value::Bool(b) }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self { Value::Number(n) }
}

macro_rules! from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self { Value::Number(n as f64) }
            }
        )*
    };
}

from_number!(i32, i64, u16, u32, u64, usize, f32);

impl From<&str> for Value {
    fn from(s: &str) -> Self { Value::String(s.to_owned()) }
}

impl From<String> for Value {
    fn from(s: String) -> Self { Value::String(s) }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s:?}"),
            Value::Number(n) => write!(f, "{n}"),
            other => write!(f, "{}", other.to_json()),
        }
    }
}
