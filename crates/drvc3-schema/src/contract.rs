//! The compiled schema contract.
//!
//! Validation runs in two phases:
//! 1. **Size limits**: depth, array and object sizes are checked before the
//!    schema engine ever sees the document.
//! 2. **Schema**: the document is checked against the JSON Schema with format
//!    validation on, collecting every violation rather than stopping at the
//!    first.

use serde_json::Value;
use tracing::debug;

use crate::error::{ContractError, SchemaViolations, Violation};

/// The bundled DRVC3 v1.0 schema document.
pub const DRVC3_SCHEMA: &str = include_str!("../../../schemas/drvc3.schema.json");

/// Maximum number of members allowed in a JSON array.
pub const MAX_ARRAY_MEMBERS: usize = 10_000;

/// Maximum number of properties allowed in a JSON object.
pub const MAX_OBJECT_PROPERTIES: usize = 10_000;

/// Maximum nesting depth allowed in a document.
pub const MAX_DEPTH: usize = 64;

/// An immutable, compiled schema contract.
///
/// Build it once per process and share it (it is `Send + Sync`); it is never
/// mutated after construction.
#[derive(Debug)]
pub struct SchemaContract {
    validator: jsonschema::Validator,
    title: Option<String>,
}

impl SchemaContract {
    /// Compile the bundled DRVC3 schema.
    pub fn drvc3() -> Result<Self, ContractError> {
        Self::from_json_str(DRVC3_SCHEMA)
    }

    /// Compile a schema from its JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, ContractError> {
        let schema: Value = serde_json::from_str(text)?;
        Self::new(&schema)
    }

    /// Compile a schema value.
    pub fn new(schema: &Value) -> Result<Self, ContractError> {
        let validator = jsonschema::options()
            .should_validate_formats(true)
            .build(schema)
            .map_err(|e| ContractError::InvalidSchema {
                message: e.to_string(),
            })?;

        let title = schema
            .get("title")
            .and_then(Value::as_str)
            .map(str::to_string);
        debug!(title = title.as_deref().unwrap_or("<untitled>"), "compiled schema contract");

        Ok(Self { validator, title })
    }

    /// The schema's `title`, if it declares one.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Check a document, returning every violation in validator order.
    pub fn validate(&self, document: &Value) -> Result<(), SchemaViolations> {
        if let Err(violation) = check_size_limits(document, "", 0) {
            return Err(SchemaViolations::new(vec![violation]));
        }

        let violations: Vec<Violation> = self
            .validator
            .iter_errors(document)
            .map(|error| {
                Violation::new(format_path(&error.instance_path.to_string()), error.to_string())
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            debug!(count = violations.len(), "document violates schema contract");
            Err(SchemaViolations::new(violations))
        }
    }

    /// Whether a document satisfies the contract.
    pub fn is_valid(&self, document: &Value) -> bool {
        self.validate(document).is_ok()
    }
}

/// Recursively check depth and container sizes.
///
/// Paths are JSON Pointers so they line up with the schema engine's.
fn check_size_limits(value: &Value, path: &str, depth: usize) -> Result<(), Violation> {
    if depth > MAX_DEPTH {
        return Err(Violation::new(
            format_path(path),
            format!("maximum depth of {MAX_DEPTH} exceeded"),
        ));
    }

    match value {
        Value::Array(items) => {
            if items.len() > MAX_ARRAY_MEMBERS {
                return Err(Violation::new(
                    format_path(path),
                    format!(
                        "array has {} members, exceeds limit of {MAX_ARRAY_MEMBERS}",
                        items.len()
                    ),
                ));
            }
            for (i, item) in items.iter().enumerate() {
                check_size_limits(item, &format!("{path}/{i}"), depth + 1)?;
            }
        }
        Value::Object(fields) => {
            if fields.len() > MAX_OBJECT_PROPERTIES {
                return Err(Violation::new(
                    format_path(path),
                    format!(
                        "object has {} properties, exceeds limit of {MAX_OBJECT_PROPERTIES}",
                        fields.len()
                    ),
                ));
            }
            for (key, field) in fields {
                let escaped = key.replace('~', "~0").replace('/', "~1");
                check_size_limits(field, &format!("{path}/{escaped}"), depth + 1)?;
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
    }

    Ok(())
}

/// Root a JSON Pointer at `$`.
fn format_path(pointer: &str) -> String {
    if pointer.is_empty() {
        "$".to_string()
    } else {
        format!("${pointer}")
    }
}
