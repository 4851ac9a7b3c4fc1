//! Author entity and its client representations

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use uuid::Uuid;

use super::book::{Book, BookForCreation};
use crate::repository::Sortable;
use crate::shaping::{FieldTable, Resource};

/// Stored author
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub genre: String,
    pub books: Vec<Book>,
}

impl Author {
    /// Create an author with a fresh id and no books
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        date_of_birth: NaiveDate,
        genre: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            date_of_birth,
            genre: genre.into(),
            books: Vec::new(),
        }
    }

    /// Build a new author, and its initial books, from a creation request
    pub fn from_creation(input: AuthorForCreation) -> Self {
        let mut author = Self::new(
            input.first_name,
            input.last_name,
            input.date_of_birth,
            input.genre,
        );
        author.books = input
            .books
            .into_iter()
            .map(|book| Book::from_creation(book, author.id))
            .collect();
        author
    }

    /// `"first last"`
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Whole years lived at `today`; zero for birth dates in the future
    pub fn age_at(&self, today: NaiveDate) -> u32 {
        today.years_since(self.date_of_birth).unwrap_or(0)
    }
}

impl Sortable for Author {
    fn has_property(property: &str) -> bool {
        ["id", "firstName", "lastName", "dateOfBirth", "genre"]
            .iter()
            .any(|known| known.eq_ignore_ascii_case(property))
    }

    fn compare_property(&self, other: &Self, property: &str) -> Ordering {
        match property.to_ascii_lowercase().as_str() {
            "id" => self.id.cmp(&other.id),
            "firstname" => compare_text(&self.first_name, &other.first_name),
            "lastname" => compare_text(&self.last_name, &other.last_name),
            "dateofbirth" => self.date_of_birth.cmp(&other.date_of_birth),
            "genre" => compare_text(&self.genre, &other.genre),
            _ => Ordering::Equal,
        }
    }
}

/// Text order ignoring case, the way the catalogue's collation sorts names
fn compare_text(left: &str, right: &str) -> Ordering {
    left.to_lowercase()
        .cmp(&right.to_lowercase())
        .then_with(|| left.cmp(right))
}

/// Author as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDto {
    pub id: Uuid,
    pub name: String,
    pub age: u32,
    pub genre: String,
}

impl AuthorDto {
    /// Client view of `author`, with the age worked out at `today`
    pub fn from_author(author: &Author, today: NaiveDate) -> Self {
        Self {
            id: author.id,
            name: author.full_name(),
            age: author.age_at(today),
            genre: author.genre.clone(),
        }
    }
}

static AUTHOR_DTO_FIELDS: Lazy<FieldTable<AuthorDto>> = Lazy::new(|| {
    FieldTable::<AuthorDto>::new("id")
        .field("id", |a| Value::from(a.id.to_string()))
        .field("name", |a| Value::from(a.name.clone()))
        .field("age", |a| Value::from(a.age))
        .field("genre", |a| Value::from(a.genre.clone()))
});

impl Resource for AuthorDto {
    fn field_table() -> &'static FieldTable<Self> {
        &AUTHOR_DTO_FIELDS
    }
}

/// Request body for creating an author, optionally with books
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorForCreation {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub genre: String,
    #[serde(default)]
    pub books: Vec<BookForCreation>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shaping::{has_properties, shape};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_age_counts_whole_years() {
        let author = Author::new("Neil", "Gaiman", date(1960, 11, 10), "Fantasy");
        assert_eq!(author.age_at(date(2020, 11, 9)), 59);
        assert_eq!(author.age_at(date(2020, 11, 10)), 60);
        assert_eq!(author.age_at(date(1950, 1, 1)), 0);
    }

    #[test]
    fn test_dto_from_author() {
        let author = Author::new("Neil", "Gaiman", date(1960, 11, 10), "Fantasy");
        let dto = AuthorDto::from_author(&author, date(2021, 1, 1));
        assert_eq!(dto.id, author.id);
        assert_eq!(dto.name, "Neil Gaiman");
        assert_eq!(dto.age, 60);
        assert_eq!(dto.genre, "Fantasy");
    }

    #[test]
    fn test_from_creation_assigns_books_to_author() {
        let input: AuthorForCreation = serde_json::from_value(serde_json::json!({
            "firstName": "Jens",
            "lastName": "Lapidus",
            "dateOfBirth": "1974-05-24",
            "genre": "Thriller",
            "books": [{ "title": "Easy Money", "description": "Stockholm noir" }]
        }))
        .unwrap();

        let author = Author::from_creation(input);
        assert_eq!(author.books.len(), 1);
        assert_eq!(author.books[0].author_id, author.id);
        assert_eq!(author.books[0].title, "Easy Money");
    }

    #[test]
    fn test_creation_books_default_to_empty() {
        let input: AuthorForCreation = serde_json::from_value(serde_json::json!({
            "firstName": "Jens",
            "lastName": "Lapidus",
            "dateOfBirth": "1974-05-24",
            "genre": "Thriller"
        }))
        .unwrap();
        assert!(input.books.is_empty());
    }

    #[test]
    fn test_sortable_properties() {
        assert!(Author::has_property("dateOfBirth"));
        assert!(Author::has_property("FIRSTNAME"));
        assert!(!Author::has_property("age"));

        let a = Author::new("anne", "Rice", date(1941, 10, 4), "Horror");
        let b = Author::new("Bram", "Stoker", date(1847, 11, 8), "Horror");
        assert_eq!(a.compare_property(&b, "firstName"), Ordering::Less);
        assert_eq!(a.compare_property(&b, "dateOfBirth"), Ordering::Greater);
        assert_eq!(a.compare_property(&b, "genre"), Ordering::Equal);
    }

    #[test]
    fn test_case_only_difference_breaks_ties_on_exact_text() {
        let lower = Author::new("Anne", "Rice", date(1941, 10, 4), "horror");
        let upper = Author::new("Anne", "Rice", date(1941, 10, 4), "Horror");
        assert_eq!(upper.compare_property(&lower, "genre"), Ordering::Less);
        assert_eq!(lower.compare_property(&upper, "genre"), Ordering::Greater);
        assert_eq!(upper.compare_property(&lower, "lastName"), Ordering::Equal);
    }

    #[test]
    fn test_author_dto_fields() {
        assert!(has_properties::<AuthorDto>(Some("id,name,age,genre")));
        assert!(!has_properties::<AuthorDto>(Some("firstName")));

        let author = Author::new("Neil", "Gaiman", date(1960, 11, 10), "Fantasy");
        let dto = AuthorDto::from_author(&author, date(2021, 1, 1));
        let shaped = shape(&dto, Some("Name"));
        assert_eq!(shaped.keys().collect::<Vec<_>>(), vec!["id", "name"]);
        assert_eq!(shaped.get("id"), Some(&Value::from(author.id.to_string())));
    }
}
