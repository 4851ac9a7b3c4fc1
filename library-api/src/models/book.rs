//! Book entity, its client representation and its write models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::responses::ValidationError;

/// Longest accepted title
pub const MAX_TITLE_LEN: usize = 100;

/// Longest accepted description
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Stored book
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub author_id: Uuid,
}

impl Book {
    /// New book for `author_id` with a fresh id
    pub fn from_creation(input: BookForCreation, author_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            author_id,
        }
    }

    /// New book for `author_id` using a client-chosen id (upsert)
    pub fn from_update(input: BookForUpdate, id: Uuid, author_id: Uuid) -> Self {
        Self {
            id,
            title: input.title,
            description: input.description,
            author_id,
        }
    }
}

/// Book as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDto {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub author_id: Uuid,
}

impl From<&Book> for BookDto {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            description: book.description.clone(),
            author_id: book.author_id,
        }
    }
}

/// Write model shared by book creation and update requests
pub trait BookForManipulation {
    fn title(&self) -> &str;
    fn description(&self) -> Option<&str>;

    /// Check the request, collecting every failing field
    ///
    /// - title is required and at most [`MAX_TITLE_LEN`] characters
    /// - description is at most [`MAX_DESCRIPTION_LEN`] characters
    /// - title and description must differ
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new("Book validation failed");
        let title = self.title();

        if title.trim().is_empty() {
            errors.add_field_error("title", "REQUIRED", "You should fill out a title.");
        } else if title.chars().count() > MAX_TITLE_LEN {
            errors.add_field_error(
                "title",
                "TOO_LONG",
                format!("The title shouldn't have more than {MAX_TITLE_LEN} characters."),
            );
        }

        if let Some(description) = self.description() {
            if description.chars().count() > MAX_DESCRIPTION_LEN {
                errors.add_field_error(
                    "description",
                    "TOO_LONG",
                    format!(
                        "The description shouldn't have more than {MAX_DESCRIPTION_LEN} characters."
                    ),
                );
            }
            if description == title {
                errors.add_field_error(
                    "book",
                    "TITLE_EQUALS_DESCRIPTION",
                    "The provided description should be different from the title.",
                );
            }
        }

        if errors.has_errors() {
            Err(errors)
        } else {
            Ok(())
        }
    }
}

/// Request body for creating a book
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookForCreation {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl BookForManipulation for BookForCreation {
    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Request body for replacing a book, and the target of patch documents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookForUpdate {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl BookForUpdate {
    /// Editable view of a stored book
    pub fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            description: book.description.clone(),
        }
    }

    /// Copy the edited fields back onto `book`
    pub fn apply_to(self, book: &mut Book) {
        book.title = self.title;
        book.description = self.description;
    }
}

impl BookForManipulation for BookForUpdate {
    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}
