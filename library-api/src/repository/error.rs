//! Repository error types
//!
//! # Example
//!
//! ```rust
//! use library_api::repository::{RepositoryError, RepositoryErrorKind};
//!
//! let error = RepositoryError::not_found("Author", "4a1c");
//! assert!(matches!(error.kind, RepositoryErrorKind::NotFound));
//! assert!(error.entity_id.is_some());
//! ```

use std::fmt;

/// Store call that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryOperation {
    FindById,
    /// Paged author listing and per-author book listing
    FindAll,
    Exists,
    Create,
    Update,
    Delete,
}

impl fmt::Display for RepositoryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FindById => write!(f, "find_by_id"),
            Self::FindAll => write!(f, "find_all"),
            Self::Exists => write!(f, "exists"),
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryErrorKind {
    /// No author or book with the given id
    NotFound,
    /// Id already taken; book ids are unique across all authors
    AlreadyExists,
    /// Sort terms name a property the entity cannot be ordered by
    InvalidSort,
    /// Underlying store failure
    StorageError,
}

impl fmt::Display for RepositoryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::AlreadyExists => write!(f, "already_exists"),
            Self::InvalidSort => write!(f, "invalid_sort"),
            Self::StorageError => write!(f, "storage_error"),
        }
    }
}

/// Store failure, tagged with the call and the entity it concerned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryError {
    pub operation: RepositoryOperation,
    pub kind: RepositoryErrorKind,
    pub message: String,
    /// `"Author"` or `"Book"`
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
}

impl RepositoryError {
    pub fn new(
        operation: RepositoryOperation,
        kind: RepositoryErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            entity_type: None,
            entity_id: None,
        }
    }

    /// `entity_type` `entity_id` does not exist
    pub fn not_found(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        let entity_type = entity_type.into();
        Self::new(
            RepositoryOperation::FindById,
            RepositoryErrorKind::NotFound,
            format!("{entity_type} not found"),
        )
        .for_entity(entity_type, entity_id)
    }

    /// `entity_type` `entity_id` is already stored
    pub fn already_exists(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        let entity_type = entity_type.into();
        Self::new(
            RepositoryOperation::Create,
            RepositoryErrorKind::AlreadyExists,
            format!("{entity_type} already exists"),
        )
        .for_entity(entity_type, entity_id)
    }

    fn for_entity(mut self, entity_type: String, entity_id: impl Into<String>) -> Self {
        self.entity_type = Some(entity_type);
        self.entity_id = Some(entity_id.into());
        self
    }

    pub fn storage_error(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::StorageError, message)
    }

    #[must_use]
    pub fn with_operation(mut self, operation: RepositoryOperation) -> Self {
        self.operation = operation;
        self
    }
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed ({}): {}", self.operation, self.kind, self.message)?;
        match (&self.entity_type, &self.entity_id) {
            (Some(entity_type), Some(entity_id)) => write!(f, " [{entity_type} {entity_id}]"),
            _ => Ok(()),
        }
    }
}

impl std::error::Error for RepositoryError {}
