#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Dynamically typed values held by a grading namespace.

use std::{collections::BTreeMap, fmt, str::FromStr, sync::Arc};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::callable::Callable;

/// A value bound to a name in a [`crate::namespace::Namespace`].
#[derive(Clone, Default)]
pub enum Value {
    /// The absence of a value.
    #[default]
    None,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A string.
    Str(String),
    /// An ordered sequence of values.
    List(Vec<Value>),
    /// A string-keyed mapping.
    Map(BTreeMap<String, Value>),
    /// Something that can be called with arguments.
    Callable(Arc<dyn Callable>),
}

impl Value {
    /// Returns the runtime type tag of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::None => ValueType::None,
            Value::Bool(_) => ValueType::Bool,
            Value::Int(_) => ValueType::Int,
            Value::Float(_) => ValueType::Float,
            Value::Str(_) => ValueType::Str,
            Value::List(_) => ValueType::List,
            Value::Map(_) => ValueType::Map,
            Value::Callable(_) => ValueType::Callable,
        }
    }

    /// Whether this value satisfies the given type tag.
    pub fn is_instance_of(&self, ty: ValueType) -> bool {
        match ty {
            ValueType::Number => matches!(self, Value::Int(_) | Value::Float(_)),
            other => self.value_type() == other,
        }
    }

    /// Numeric view of ints and floats. Booleans are not numbers here.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the items if this value is a list.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the string if this value is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the callable if this value is one.
    pub fn as_callable(&self) -> Option<&Arc<dyn Callable>> {
        match self {
            Value::Callable(f) => Some(f),
            _ => None,
        }
    }

    /// Quoted representation, used for values nested in containers and for
    /// argument listings.
    pub fn repr(&self) -> String {
        match self {
            Value::Str(s) => format!("'{}'", s.replace('\'', "\\'")),
            other => other.to_string(),
        }
    }
}

/// Formats a float so integral values keep a trailing `.0`.
pub(crate) fn format_float(f: f64) -> String {
    if f.is_nan() {
        "nan".to_string()
    } else if f.is_infinite() {
        let s = if f > 0.0 { "inf" } else { "-inf" };
        s.to_string()
    } else if f.fract() == 0.0 && f.abs() < 1e16 {
        format!("{f:.1}")
    } else {
        format!("{f}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{}", format_float(*x)),
            Value::Str(s) => write!(f, "{s}"),
            Value::List(items) => write!(f, "[{}]", items.iter().map(Value::repr).join(", ")),
            Value::Map(map) => write!(
                f,
                "{{{}}}",
                map.iter()
                    .map(|(k, v)| format!("'{k}': {}", v.repr()))
                    .join(", ")
            ),
            Value::Callable(c) => write!(f, "<function {}>", c.name()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.repr())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
                self.as_f64() == other.as_f64()
            }
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Callable(a), Value::Callable(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i.into())
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::Map(map)
    }
}

impl From<Arc<dyn Callable>> for Value {
    fn from(f: Arc<dyn Callable>) -> Self {
        Value::Callable(f)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::None,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

/// Runtime type tags a variable case can require.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// Only `None`.
    None,
    /// Booleans.
    Bool,
    /// Integers.
    Int,
    /// Floats.
    Float,
    /// Integers or floats.
    Number,
    /// Strings.
    #[serde(alias = "string")]
    Str,
    /// Lists.
    List,
    /// Maps.
    #[serde(alias = "dict")]
    Map,
    /// Functions and other callables.
    #[serde(alias = "function")]
    Callable,
}

impl ValueType {
    /// Returns the lowercase name of the type.
    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::None => "none",
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Number => "number",
            ValueType::Str => "str",
            ValueType::List => "list",
            ValueType::Map => "map",
            ValueType::Callable => "callable",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "none" => ValueType::None,
            "bool" => ValueType::Bool,
            "int" => ValueType::Int,
            "float" => ValueType::Float,
            "number" => ValueType::Number,
            "str" | "string" => ValueType::Str,
            "list" => ValueType::List,
            "map" | "dict" => ValueType::Map,
            "callable" | "function" => ValueType::Callable,
            other => return Err(format!("unknown value type `{other}`")),
        })
    }
}
