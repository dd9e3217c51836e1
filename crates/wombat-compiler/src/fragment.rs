//! Ordered key/value tree used to assemble compiled documents.
//!
//! Keys keep insertion order, so a compiler that writes its fields in a
//! fixed sequence produces byte-identical YAML for identical input.

use serde::Serialize;
use serde_json::{Map, Value};

/// One node of the compiled configuration tree.
///
/// Every setter consumes and returns the fragment so calls chain, and every
/// setter overwrites an existing key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Fragment(Map<String, Value>);

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn scalar(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Set `key` only when `value` is present.
    #[must_use]
    pub fn opt_scalar<V: Into<Value>>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.scalar(key, value),
            None => self,
        }
    }

    #[must_use]
    pub fn list<I, V>(mut self, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.0.insert(key.to_string(), Value::Array(values));
        self
    }

    #[must_use]
    pub fn fragment(mut self, key: &str, fragment: Fragment) -> Self {
        self.0.insert(key.to_string(), Value::Object(fragment.0));
        self
    }

    #[must_use]
    pub fn fragments<I>(mut self, key: &str, fragments: I) -> Self
    where
        I: IntoIterator<Item = Fragment>,
    {
        let values = fragments.into_iter().map(Value::from).collect();
        self.0.insert(key.to_string(), Value::Array(values));
        self
    }

    /// Embed an opaque map verbatim.
    #[must_use]
    pub fn map(mut self, key: &str, map: Map<String, Value>) -> Self {
        self.0.insert(key.to_string(), Value::Object(map));
        self
    }

    #[must_use]
    pub fn string_map<I, K, V>(mut self, key: &str, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), Value::String(v.into())))
            .collect();
        self.0.insert(key.to_string(), Value::Object(map));
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Structural equality against an arbitrary JSON value. Key order is
    /// not significant.
    pub fn equals_map(&self, expected: &Value) -> bool {
        matches!(expected, Value::Object(map) if *map == self.0)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Fragment> for Value {
    fn from(fragment: Fragment) -> Self {
        fragment.into_value()
    }
}
