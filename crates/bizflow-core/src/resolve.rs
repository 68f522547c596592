//! Layered field resolution for node configuration.
//!
//! A node handler reads each field from several JSON objects in a fixed
//! precedence order (typically the node's own config, then a nested payload
//! object from the upstream output, then the flat upstream output). `Layers`
//! holds that ordered list and answers every lookup the same way: the first
//! layer with a present value wins. Null and empty strings count as absent.

use serde_json::{Map, Value};

/// Ordered, read-only view over optional JSON object sources.
#[derive(Debug, Clone, Default)]
pub struct Layers<'a> {
    sources: Vec<&'a Map<String, Value>>,
}

impl<'a> Layers<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer with lower precedence than all existing ones.
    pub fn push(mut self, source: &'a Map<String, Value>) -> Self {
        self.sources.push(source);
        self
    }

    /// Append a layer only if `value` is a JSON object.
    pub fn push_value(mut self, value: Option<&'a Value>) -> Self {
        if let Some(Value::Object(map)) = value {
            self.sources.push(map);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// First present value for `key`.
    pub fn value(&self, key: &str) -> Option<&'a Value> {
        self.sources
            .iter()
            .copied()
            .filter_map(|source| source.get(key))
            .find(|v| is_present(v))
    }

    /// First present value rendered as a string.
    ///
    /// Numbers and booleans are stringified; objects and arrays are skipped.
    pub fn string(&self, key: &str) -> Option<String> {
        self.sources
            .iter()
            .copied()
            .filter_map(|source| source.get(key))
            .filter(|v| is_present(v))
            .find_map(scalar_to_string)
    }

    /// First present string among several key aliases, alias order first.
    pub fn string_any(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| self.string(key))
    }

    /// Whether any layer holds `expected` under `key`, regardless of precedence.
    pub fn any_equals(&self, key: &str, expected: &str) -> bool {
        self.sources
            .iter()
            .any(|source| source.get(key).and_then(Value::as_str) == Some(expected))
    }

    /// Like [`Layers::string`], falling back to `default`.
    pub fn string_or(&self, key: &str, default: &str) -> String {
        self.string(key).unwrap_or_else(|| default.to_string())
    }

    /// First present value parseable as a number (numeric strings included).
    pub fn number(&self, key: &str) -> Option<f64> {
        self.sources
            .iter()
            .copied()
            .filter_map(|source| source.get(key))
            .filter(|v| is_present(v))
            .find_map(|v| match v {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse().ok(),
                _ => None,
            })
    }

    /// First present value that is a JSON object.
    pub fn object(&self, key: &str) -> Option<&'a Map<String, Value>> {
        self.sources
            .iter()
            .copied()
            .filter_map(|source| source.get(key))
            .find_map(Value::as_object)
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
