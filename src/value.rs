/*!
# JSON Value

The in-memory tree produced by the parser. Containers own their children, so a
tree is always acyclic and is never mutated once [`crate::parse`] returns it.
*/
use std::collections::HashMap;
use std::str::FromStr;

use crate::parser::{ParseError, parse};

/// A parsed JSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Represents a JSON null value
    Null,
    /// Represents a JSON Boolean value
    Bool(bool),
    /// Represents a JSON number, always held as a float
    Number(f64),
    /// Represents a JSON string value, verbatim from the source
    String(String),
    /// Represents a JSON array containing values of any type
    Array(Vec<Value>),
    /// Represents a JSON object with string keys and values of any type
    Object(HashMap<String, Value>),
}

impl Value {
    /// Compute the depth of the JSON document.
    ///
    /// Scalars and empty containers have depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Object(map) => {
                let inner_depth =
                    map.values().map(Self::depth).max().unwrap_or(0);
                1 + inner_depth
            }
            Self::Array(arr) => {
                let inner_depth =
                    arr.iter().map(Self::depth).max().unwrap_or(0);
                1 + inner_depth
            }
            Self::Null | Self::Bool(_) | Self::Number(_) | Self::String(_) => 1,
        }
    }

    /// Name of the variant, as used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&[Self]> {
        match self {
            Self::Array(arr) => Some(arr),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_object(&self) -> Option<&HashMap<String, Self>> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a member of an object. Returns `None` for non-objects.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Look up an element of an array. Returns `None` for non-arrays.
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<&Self> {
        self.as_array().and_then(|arr| arr.get(index))
    }
}

impl FromStr for Value {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

// `TryFrom` since the input may be malformed
impl TryFrom<&str> for Value {
    type Error = ParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        parse(value)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            // every serde_json number fits an f64 unless arbitrary precision
            // is enabled, in which case NaN flags the loss
            serde_json::Value::Number(number) => {
                Self::Number(number.as_f64().unwrap_or(f64::NAN))
            }
            serde_json::Value::String(str) => Self::String(str),
            serde_json::Value::Array(values) => {
                Self::Array(values.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => Self::Object(
                map.into_iter().map(|(k, v)| (k, Self::from(v))).collect(),
            ),
        }
    }
}
