#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! The read-only name bindings a grading session inspects.

use std::collections::HashMap;

use crate::{
    grade::GradeError,
    value::{Value, ValueType},
};

/// A mapping from identifiers to student-defined values.
///
/// Graders only ever borrow a namespace; it is built and owned by the caller.
#[derive(Clone, Default, Debug)]
pub struct Namespace {
    /// Bound values by name.
    bindings: HashMap<String, Value>,
}

impl Namespace {
    /// Creates an empty namespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the namespace with `name` bound to `value`.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.bindings.insert(name.into(), value.into());
        self
    }

    /// Builds a namespace from a JSON object.
    pub fn from_json(json: serde_json::Value) -> Result<Self, GradeError> {
        match json {
            serde_json::Value::Object(map) => Ok(map
                .into_iter()
                .map(|(name, value)| (name, Value::from(value)))
                .collect()),
            other => Err(GradeError::Config(format!(
                "a namespace must be a JSON object, found `{other}`"
            ))),
        }
    }

    /// Whether `name` is bound.
    pub fn is_defined(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Returns the value bound to `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Whether `name` is bound to a value of type `ty`. Unbound names never
    /// match.
    pub fn has_type(&self, name: &str, ty: ValueType) -> bool {
        self.get(name).is_some_and(|v| v.is_instance_of(ty))
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Namespace {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            bindings: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
