//! Typed JSON Patch documents applied to update models
//!
//! A [`PatchDocument`] is the body of a `PATCH` request: an ordered list of
//! operations against the top-level fields of a write model. The model
//! exposes its fields through [`Patchable`]; nested paths are not supported.
//!
//! ```rust
//! use library_api::models::BookForUpdate;
//! use library_api::patch::PatchDocument;
//!
//! let doc: PatchDocument = serde_json::from_str(
//!     r#"[{"op":"replace","path":"/title","value":"Dune"}]"#,
//! ).unwrap();
//!
//! let mut book = BookForUpdate::default();
//! doc.apply_to(&mut book).unwrap();
//! assert_eq!(book.title, "Dune");
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::models::BookForUpdate;
use crate::responses::ValidationError;

/// Patch application failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    /// Path is not of the form `/field`
    #[error("Invalid patch path '{0}'")]
    InvalidPath(String),

    /// Path names no field of the target
    #[error("The target has no field at '{0}'")]
    UnknownField(String),

    /// Value has the wrong type for the field
    #[error("Invalid value for '{path}': {message}")]
    InvalidValue {
        /// Field path
        path: String,
        /// What was expected
        message: String,
    },

    /// A `test` operation did not match
    #[error("Test operation failed at '{0}'")]
    TestFailed(String),
}

impl PatchError {
    fn path(&self) -> &str {
        match self {
            PatchError::InvalidPath(path)
            | PatchError::UnknownField(path)
            | PatchError::TestFailed(path)
            | PatchError::InvalidValue { path, .. } => path,
        }
    }

    /// Report this failure as a 422 body
    pub fn into_validation_error(self) -> ValidationError {
        let mut errors = ValidationError::new("Patch document could not be applied");
        let field = self.path().trim_start_matches('/').to_string();
        errors.add_field_error(field, "PATCH_FAILED", self.to_string());
        errors
    }
}

/// One patch operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOperation {
    Add { path: String, value: Value },
    Replace { path: String, value: Value },
    Remove { path: String },
    Copy { from: String, path: String },
    Move { from: String, path: String },
    Test { path: String, value: Value },
}

/// Ordered list of patch operations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatchDocument {
    pub operations: Vec<PatchOperation>,
}

impl PatchDocument {
    /// Wrap operations
    pub fn new(operations: Vec<PatchOperation>) -> Self {
        Self { operations }
    }

    /// Apply every operation in order
    ///
    /// All or nothing: on the first failure `target` is left unchanged.
    pub fn apply_to<T: Patchable + Clone>(&self, target: &mut T) -> Result<(), PatchError> {
        let mut working = target.clone();
        for operation in &self.operations {
            apply_operation(&mut working, operation)?;
        }
        *target = working;
        Ok(())
    }
}

fn apply_operation<T: Patchable>(target: &mut T, operation: &PatchOperation) -> Result<(), PatchError> {
    match operation {
        PatchOperation::Add { path, value } | PatchOperation::Replace { path, value } => {
            target.set_field(field_name(path)?, path, value.clone())
        }
        PatchOperation::Remove { path } => target.clear_field(field_name(path)?, path),
        PatchOperation::Copy { from, path } => {
            let value = target.get_field(field_name(from)?, from)?;
            target.set_field(field_name(path)?, path, value)
        }
        PatchOperation::Move { from, path } => {
            let value = target.get_field(field_name(from)?, from)?;
            target.clear_field(field_name(from)?, from)?;
            target.set_field(field_name(path)?, path, value)
        }
        PatchOperation::Test { path, value } => {
            if target.get_field(field_name(path)?, path)? == *value {
                Ok(())
            } else {
                Err(PatchError::TestFailed(path.clone()))
            }
        }
    }
}

/// `/field` to `field`
fn field_name(path: &str) -> Result<&str, PatchError> {
    match path.strip_prefix('/') {
        Some(name) if !name.is_empty() && !name.contains('/') => Ok(name),
        _ => Err(PatchError::InvalidPath(path.to_string())),
    }
}

/// A write model whose top-level fields can be patched by name
///
/// `name` is the path without its leading slash and matches
/// case-insensitively; `path` is the original path, for error reports.
pub trait Patchable {
    fn get_field(&self, name: &str, path: &str) -> Result<Value, PatchError>;
    fn set_field(&mut self, name: &str, path: &str, value: Value) -> Result<(), PatchError>;
    /// Reset a field to its empty value
    fn clear_field(&mut self, name: &str, path: &str) -> Result<(), PatchError>;
}

fn expect_string(path: &str, value: Value) -> Result<String, PatchError> {
    match value {
        Value::String(text) => Ok(text),
        _ => Err(PatchError::InvalidValue {
            path: path.to_string(),
            message: "expected a string".to_string(),
        }),
    }
}

impl Patchable for BookForUpdate {
    fn get_field(&self, name: &str, path: &str) -> Result<Value, PatchError> {
        match name.to_ascii_lowercase().as_str() {
            "title" => Ok(Value::from(self.title.clone())),
            "description" => Ok(self.description.clone().map_or(Value::Null, Value::from)),
            _ => Err(PatchError::UnknownField(path.to_string())),
        }
    }

    fn set_field(&mut self, name: &str, path: &str, value: Value) -> Result<(), PatchError> {
        match name.to_ascii_lowercase().as_str() {
            "title" => {
                self.title = expect_string(path, value)?;
                Ok(())
            }
            "description" => {
                self.description = match value {
                    Value::Null => None,
                    other => Some(expect_string(path, other)?),
                };
                Ok(())
            }
            _ => Err(PatchError::UnknownField(path.to_string())),
        }
    }

    fn clear_field(&mut self, name: &str, path: &str) -> Result<(), PatchError> {
        match name.to_ascii_lowercase().as_str() {
            "title" => {
                self.title.clear();
                Ok(())
            }
            "description" => {
                self.description = None;
                Ok(())
            }
            _ => Err(PatchError::UnknownField(path.to_string())),
        }
    }
}
