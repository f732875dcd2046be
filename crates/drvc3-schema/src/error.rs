//! Error types for schema compilation and validation.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// A single structural violation: where it happened and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// JSON Pointer to the offending value, rooted at `$`.
    pub path: String,
    /// Human-readable reason.
    pub message: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.path, self.message)
    }
}

/// Every violation found in a document, in the order the validator reported them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SchemaViolations(Vec<Violation>);

impl SchemaViolations {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self(violations)
    }

    /// A document-level failure with a single violation at the root.
    pub fn root(message: impl Into<String>) -> Self {
        Self(vec![Violation::new("$", message)])
    }

    pub fn violations(&self) -> &[Violation] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether any violation sits at or below `path`.
    pub fn touches(&self, path: &str) -> bool {
        self.0.iter().any(|v| v.path.starts_with(path))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }
}

impl fmt::Display for SchemaViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "schema validation failed: ")?;
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaViolations {}

impl IntoIterator for SchemaViolations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Errors building a [`crate::SchemaContract`].
#[derive(Debug, Error)]
pub enum ContractError {
    /// The schema text is not JSON.
    #[error("schema document is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The JSON is not a usable JSON Schema.
    #[error("invalid JSON schema: {message}")]
    InvalidSchema { message: String },
}
