//! In-memory [`LibraryRepository`]

use tokio::sync::RwLock;
use uuid::Uuid;

use super::error::{RepositoryError, RepositoryOperation};
use super::filter::AuthorQuery;
use super::pagination::{paginate, Page};
use super::sort::sort_by_terms;
use super::traits::{LibraryRepository, RepositoryResult};
use crate::models::{Author, Book};

/// Authors (with their books) held in insertion order behind a lock
#[derive(Debug, Default)]
pub struct InMemoryLibraryRepository {
    authors: RwLock<Vec<Author>>,
}

impl InMemoryLibraryRepository {
    /// Empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-loaded with `authors`
    pub fn with_authors(authors: Vec<Author>) -> Self {
        Self {
            authors: RwLock::new(authors),
        }
    }
}

fn book_id_taken(authors: &[Author], book_id: Uuid) -> bool {
    authors
        .iter()
        .flat_map(|author| author.books.iter())
        .any(|book| book.id == book_id)
}

/// Reject `author` if its id or any of its book ids is already in `authors`
fn check_new_author(authors: &[Author], author: &Author) -> RepositoryResult<()> {
    if authors.iter().any(|existing| existing.id == author.id) {
        return Err(RepositoryError::already_exists("Author", author.id.to_string()));
    }
    if let Some(book) = author
        .books
        .iter()
        .enumerate()
        .find(|(index, book)| {
            book_id_taken(authors, book.id)
                || author.books[..*index].iter().any(|other| other.id == book.id)
        })
        .map(|(_, book)| book)
    {
        return Err(RepositoryError::already_exists("Book", book.id.to_string()));
    }
    Ok(())
}

fn attach_books(mut author: Author) -> Author {
    let author_id = author.id;
    for book in &mut author.books {
        book.author_id = author_id;
    }
    author
}

impl LibraryRepository for InMemoryLibraryRepository {
    async fn list_authors(&self, query: &AuthorQuery) -> RepositoryResult<Page<Author>> {
        let authors = self.authors.read().await;
        let mut matching: Vec<Author> = authors
            .iter()
            .filter(|author| query.filter.matches(author))
            .cloned()
            .collect();
        drop(authors);

        sort_by_terms(&mut matching, &query.sort)?;
        Ok(paginate(matching, query.page))
    }

    async fn find_author(&self, id: Uuid) -> RepositoryResult<Option<Author>> {
        let authors = self.authors.read().await;
        Ok(authors.iter().find(|author| author.id == id).cloned())
    }

    async fn find_authors(&self, ids: &[Uuid]) -> RepositoryResult<Vec<Author>> {
        let authors = self.authors.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| authors.iter().find(|author| author.id == *id).cloned())
            .collect())
    }

    async fn author_exists(&self, id: Uuid) -> RepositoryResult<bool> {
        let authors = self.authors.read().await;
        Ok(authors.iter().any(|author| author.id == id))
    }

    async fn add_author(&self, author: Author) -> RepositoryResult<Author> {
        let mut authors = self.authors.write().await;
        check_new_author(&authors, &author)?;

        let author = attach_books(author);
        authors.push(author.clone());
        Ok(author)
    }

    async fn add_authors(&self, batch: Vec<Author>) -> RepositoryResult<Vec<Author>> {
        let mut authors = self.authors.write().await;
        let mut accepted: Vec<Author> = Vec::with_capacity(batch.len());
        for author in batch {
            check_new_author(&authors, &author)?;
            check_new_author(&accepted, &author)?;
            accepted.push(attach_books(author));
        }

        authors.extend(accepted.iter().cloned());
        Ok(accepted)
    }

    async fn delete_author(&self, id: Uuid) -> RepositoryResult<bool> {
        let mut authors = self.authors.write().await;
        let before = authors.len();
        authors.retain(|author| author.id != id);
        Ok(authors.len() != before)
    }

    async fn books_for_author(&self, author_id: Uuid) -> RepositoryResult<Vec<Book>> {
        let authors = self.authors.read().await;
        authors
            .iter()
            .find(|author| author.id == author_id)
            .map(|author| author.books.clone())
            .ok_or_else(|| {
                RepositoryError::not_found("Author", author_id.to_string())
                    .with_operation(RepositoryOperation::FindAll)
            })
    }

    async fn find_book_for_author(
        &self,
        author_id: Uuid,
        book_id: Uuid,
    ) -> RepositoryResult<Option<Book>> {
        let authors = self.authors.read().await;
        Ok(authors
            .iter()
            .find(|author| author.id == author_id)
            .and_then(|author| author.books.iter().find(|book| book.id == book_id))
            .cloned())
    }

    async fn add_book_for_author(&self, author_id: Uuid, book: Book) -> RepositoryResult<Book> {
        let mut authors = self.authors.write().await;
        if book_id_taken(&authors, book.id) {
            return Err(RepositoryError::already_exists("Book", book.id.to_string()));
        }

        let author = authors
            .iter_mut()
            .find(|author| author.id == author_id)
            .ok_or_else(|| {
                RepositoryError::not_found("Author", author_id.to_string())
                    .with_operation(RepositoryOperation::Create)
            })?;

        let book = Book { author_id, ..book };
        author.books.push(book.clone());
        Ok(book)
    }

    async fn update_book(&self, book: Book) -> RepositoryResult<Book> {
        let mut authors = self.authors.write().await;
        let stored = authors
            .iter_mut()
            .find(|author| author.id == book.author_id)
            .and_then(|author| author.books.iter_mut().find(|stored| stored.id == book.id))
            .ok_or_else(|| {
                RepositoryError::not_found("Book", book.id.to_string())
                    .with_operation(RepositoryOperation::Update)
            })?;

        *stored = book.clone();
        Ok(book)
    }

    async fn delete_book(&self, author_id: Uuid, book_id: Uuid) -> RepositoryResult<bool> {
        let mut authors = self.authors.write().await;
        let Some(author) = authors.iter_mut().find(|author| author.id == author_id) else {
            return Ok(false);
        };

        let before = author.books.len();
        author.books.retain(|book| book.id != book_id);
        Ok(author.books.len() != before)
    }
}
