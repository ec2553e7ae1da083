//! Reconcile fetched documents with their default shape.
//!
//! The default shape drives the walk: every field it declares is present in
//! the result, and anything the raw document adds beyond it is dropped.

use log::{debug, warn};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// How a sequence field treats an incoming value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrayRule {
    /// Any incoming sequence replaces the default, including an empty one.
    #[default]
    Replace,
    /// An empty incoming sequence keeps the default sequence.
    FallbackWhenEmpty,
}

/// Per-field overrides applied while merging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergePolicy {
    array_rules: HashMap<String, ArrayRule>,
}

impl MergePolicy {
    /// Policy with no overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the default sequence at `path` when the incoming one is empty.
    pub fn fallback_when_empty(mut self, path: impl Into<String>) -> Self {
        self.array_rules
            .insert(path.into(), ArrayRule::FallbackWhenEmpty);
        self
    }

    /// Rule for the sequence at `path`.
    pub fn rule_for(&self, path: &str) -> ArrayRule {
        self.array_rules.get(path).copied().unwrap_or_default()
    }

    /// Paths with a non-default rule, sorted.
    pub fn overridden_paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.array_rules.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }
}

/// Merge a raw document into the default shape.
///
/// `null`, missing keys, and empty strings count as absent and fall back to
/// the default. `false`, `0`, and empty sequences count as present unless a
/// sequence is registered with [`ArrayRule::FallbackWhenEmpty`].
///
/// A scalar default takes any scalar raw value but never an object or an
/// array, so the result has exactly the default's key set. A `null` default
/// takes whatever is stored.
pub fn merge_with_default(raw: Option<&Value>, default: &Value, policy: &MergePolicy) -> Value {
    match raw {
        Some(raw) => merge_value(raw, default, policy, ""),
        None => default.clone(),
    }
}

fn merge_value(raw: &Value, default: &Value, policy: &MergePolicy, path: &str) -> Value {
    if is_absent(raw) {
        return default.clone();
    }
    match (default, raw) {
        (Value::Object(default_map), Value::Object(raw_map)) => {
            let mut merged = Map::with_capacity(default_map.len());
            for (key, default_value) in default_map {
                let child_path = join_path(path, key);
                let value = match raw_map.get(key) {
                    Some(raw_value) => merge_value(raw_value, default_value, policy, &child_path),
                    None => default_value.clone(),
                };
                merged.insert(key.clone(), value);
            }
            for key in raw_map.keys().filter(|key| !default_map.contains_key(*key)) {
                debug!("dropping unknown field {}", join_path(path, key));
            }
            Value::Object(merged)
        }
        (Value::Object(_), _) => {
            warn!(
                "shape mismatch at {}: expected object, found {}; keeping default",
                display_path(path),
                kind_of(raw)
            );
            default.clone()
        }
        (Value::Array(_), Value::Array(items)) => {
            if items.is_empty() && policy.rule_for(path) == ArrayRule::FallbackWhenEmpty {
                debug!("empty sequence at {path}; keeping default");
                default.clone()
            } else {
                raw.clone()
            }
        }
        (Value::Array(_), _) => {
            warn!(
                "shape mismatch at {}: expected array, found {}; keeping default",
                display_path(path),
                kind_of(raw)
            );
            default.clone()
        }
        (Value::Null, _) => raw.clone(),
        (_, Value::Object(_) | Value::Array(_)) => {
            warn!(
                "shape mismatch at {}: expected {}, found {}; keeping default",
                display_path(path),
                kind_of(default),
                kind_of(raw)
            );
            default.clone()
        }
        _ => raw.clone(),
    }
}

fn is_absent(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}

/// Name of a JSON value's variant, used in diagnostics.
pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() { "root" } else { path }
}
