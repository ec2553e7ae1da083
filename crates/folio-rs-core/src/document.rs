//! Documents and path-addressed reads and writes.

use crate::error::CoreError;
use crate::merge::kind_of;
use crate::path::{Path, PathStep};
use log::error;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One editable content record.
///
/// Writes either consume the document (`set`), clone it first (`with_value`),
/// or update it in place (`set_in_place`). A failed write leaves the
/// document exactly as it was.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Value);

impl Default for Document {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl Document {
    /// Wrap a JSON value.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// An empty mapping.
    pub fn empty() -> Self {
        Self(Value::Object(Map::new()))
    }

    /// Borrow the underlying value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Unwrap the underlying value.
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Read the value at a dot path. Unparsable or unresolvable paths yield `None`.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let path = Path::parse(path).ok()?;
        get_at_path(&self.0, &path)
    }

    /// Read the value at a parsed path.
    pub fn get_path(&self, path: &Path) -> Option<&Value> {
        get_at_path(&self.0, path)
    }

    /// Write `value` at a dot path, returning the updated document.
    pub fn set(mut self, path: &str, value: impl Into<Value>) -> Result<Self, CoreError> {
        self.set_in_place(path, value)?;
        Ok(self)
    }

    /// Write `value` at a dot path into a copy, leaving `self` untouched.
    pub fn with_value(&self, path: &str, value: impl Into<Value>) -> Result<Self, CoreError> {
        self.clone().set(path, value)
    }

    /// Write `value` at a dot path in place.
    pub fn set_in_place(&mut self, path: &str, value: impl Into<Value>) -> Result<(), CoreError> {
        let parsed =
            Path::parse(path).inspect_err(|err| error!("document write failed: {err}"))?;
        self.set_path_in_place(&parsed, value.into())
    }

    /// Write `value` at a parsed path in place.
    pub fn set_path_in_place(&mut self, path: &Path, value: Value) -> Result<(), CoreError> {
        set_at_path(&mut self.0, path, value)
            .inspect_err(|err| error!("document write failed: {err}"))
    }

    /// Apply edits in order; later writes to the same path win.
    pub fn apply_edits<I, P>(mut self, edits: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = (P, Value)>,
        P: AsRef<str>,
    {
        for (path, value) in edits {
            self.set_in_place(path.as_ref(), value)?;
        }
        Ok(self)
    }
}

/// Resolve `path` inside `root` without failing.
pub fn get_at_path<'a>(root: &'a Value, path: &Path) -> Option<&'a Value> {
    let mut current = root;
    for step in path.steps() {
        current = match (current, step) {
            (Value::Object(map), PathStep::Key(key)) => map.get(key)?,
            (Value::Object(map), PathStep::Index(index)) => map.get(&index.to_string())?,
            (Value::Array(items), PathStep::Index(index)) => items.get(*index)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Write `value` at `path` inside `root`.
///
/// Missing or `null` intermediates become empty mappings. Sequences are never
/// created: an index step needs an existing sequence, and may address at most
/// one past its end (an append) on the final step. `root` is untouched when an
/// error is returned.
pub fn set_at_path(root: &mut Value, path: &Path, value: Value) -> Result<(), CoreError> {
    check_writable(root, path)?;
    let Some((last, parents)) = path.steps().split_last() else {
        return Err(CoreError::MalformedPath {
            path: path.to_string(),
            reason: "path is empty".to_string(),
        });
    };

    let mut current = root;
    for (depth, step) in parents.iter().enumerate() {
        if current.is_null() {
            *current = Value::Object(Map::new());
        }
        current = match current {
            Value::Object(map) => map
                .entry(step.key())
                .or_insert_with(|| Value::Object(Map::new())),
            Value::Array(items) => match step {
                PathStep::Index(index) => {
                    let len = items.len();
                    match items.get_mut(*index) {
                        Some(item) => item,
                        None => return Err(out_of_bounds(path, depth, *index, len)),
                    }
                }
                PathStep::Key(_) => return Err(not_a_container(path, depth, "array")),
            },
            other => return Err(not_a_container(path, depth, kind_of(other))),
        };
    }

    if current.is_null() {
        *current = Value::Object(Map::new());
    }
    match current {
        Value::Object(map) => {
            map.insert(last.key(), value);
        }
        Value::Array(items) => match last {
            PathStep::Index(index) if *index < items.len() => items[*index] = value,
            PathStep::Index(index) if *index == items.len() => items.push(value),
            PathStep::Index(index) => {
                return Err(out_of_bounds(path, parents.len(), *index, items.len()));
            }
            PathStep::Key(_) => return Err(not_a_container(path, parents.len(), "array")),
        },
        other => return Err(not_a_container(path, parents.len(), kind_of(other))),
    }
    Ok(())
}

/// Dry run of `set_at_path` so failed writes never leave partial changes.
fn check_writable(root: &Value, path: &Path) -> Result<(), CoreError> {
    let steps = path.steps();
    let mut current = Some(root);
    for (depth, step) in steps.iter().enumerate() {
        let is_last = depth + 1 == steps.len();
        let node = match current {
            Some(node) if !node.is_null() => node,
            _ => {
                // Created as an empty mapping during the write.
                if matches!(step, PathStep::Index(_)) {
                    return Err(CoreError::MissingSequence {
                        path: path.to_string(),
                        at: location(path, depth),
                    });
                }
                current = None;
                continue;
            }
        };
        current = match (node, step) {
            (Value::Object(map), step) => map.get(&step.key()),
            (Value::Array(items), PathStep::Index(index)) => {
                let in_bounds = if is_last {
                    *index <= items.len()
                } else {
                    *index < items.len()
                };
                if !in_bounds {
                    return Err(out_of_bounds(path, depth, *index, items.len()));
                }
                items.get(*index)
            }
            (Value::Array(_), PathStep::Key(_)) => {
                return Err(not_a_container(path, depth, "array"));
            }
            (other, _) => return Err(not_a_container(path, depth, kind_of(other))),
        };
    }
    Ok(())
}

fn location(path: &Path, depth: usize) -> String {
    if depth == 0 {
        "root".to_string()
    } else {
        path.prefix(depth)
    }
}

fn not_a_container(path: &Path, depth: usize, found: &'static str) -> CoreError {
    CoreError::NotAContainer {
        path: path.to_string(),
        at: location(path, depth),
        found,
    }
}

fn out_of_bounds(path: &Path, depth: usize, index: usize, len: usize) -> CoreError {
    CoreError::IndexOutOfBounds {
        path: path.to_string(),
        at: location(path, depth),
        index,
        len,
    }
}
