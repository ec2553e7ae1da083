//! Dot-delimited field addresses.
//!
//! Editors address fields with strings such as `general.socials.instagram`
//! or `cards.2.alt`. Strings are parsed once into typed steps so malformed
//! input is rejected before any document is touched.

use crate::error::CoreError;
use std::fmt;
use std::str::FromStr;

/// One step of a parsed path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathStep {
    /// Field lookup in a mapping.
    Key(String),
    /// Position in a sequence. Applied to a mapping it looks up the decimal key.
    Index(usize),
}

impl PathStep {
    fn parse(segment: &str) -> Self {
        let canonical = segment == "0" || !segment.starts_with('0');
        if canonical
            && segment.bytes().all(|byte| byte.is_ascii_digit())
            && let Ok(index) = segment.parse::<usize>()
        {
            return PathStep::Index(index);
        }
        PathStep::Key(segment.to_string())
    }

    /// Mapping key this step resolves to.
    pub fn key(&self) -> String {
        match self {
            PathStep::Key(key) => key.clone(),
            PathStep::Index(index) => index.to_string(),
        }
    }
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStep::Key(key) => f.write_str(key),
            PathStep::Index(index) => write!(f, "{index}"),
        }
    }
}

/// A parsed, non-empty field address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    steps: Vec<PathStep>,
}

impl Path {
    /// Parse a dot-delimited path.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        if raw.is_empty() {
            return Err(malformed(raw, "path is empty"));
        }
        let mut steps = Vec::new();
        for (position, segment) in raw.split('.').enumerate() {
            if segment.is_empty() {
                return Err(malformed(
                    raw,
                    &format!("empty segment at position {position}"),
                ));
            }
            steps.push(PathStep::parse(segment));
        }
        Ok(Self { steps })
    }

    /// Parsed steps, outermost first.
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false for a parsed path.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Final step.
    pub fn last(&self) -> &PathStep {
        &self.steps[self.steps.len() - 1]
    }

    /// Path without its final step; `None` for a single-step path.
    pub fn parent(&self) -> Option<Path> {
        match self.steps.split_last() {
            Some((_, parents)) if !parents.is_empty() => Some(Path {
                steps: parents.to_vec(),
            }),
            _ => None,
        }
    }

    /// Dot string of the first `count` steps, used in diagnostics.
    pub fn prefix(&self, count: usize) -> String {
        let count = count.min(self.steps.len());
        self.steps[..count]
            .iter()
            .map(PathStep::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }

    /// The innermost index step together with the key that names its sequence.
    ///
    /// `home.services.2.image` yields `("services", 2)`.
    pub fn indexed_field(&self) -> Option<(&str, usize)> {
        self.steps.windows(2).rev().find_map(|pair| match pair {
            [PathStep::Key(field), PathStep::Index(index)] => Some((field.as_str(), *index)),
            _ => None,
        })
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.prefix(self.steps.len()))
    }
}

impl FromStr for Path {
    type Err = CoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Path::parse(raw)
    }
}

fn malformed(raw: &str, reason: &str) -> CoreError {
    CoreError::MalformedPath {
        path: raw.to_string(),
        reason: reason.to_string(),
    }
}
