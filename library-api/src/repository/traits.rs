//! Library repository trait
//!
//! Uses RPITIT (Return Position Impl Trait In Traits) for async methods, so
//! implementations write plain `async fn` and no `async_trait` is needed.

use std::future::Future;

use uuid::Uuid;

use super::error::RepositoryError;
use super::filter::AuthorQuery;
use super::pagination::Page;
use crate::models::{Author, Book};

/// Result type for repository operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Storage operations behind the author and book handlers
///
/// # Example
///
/// ```rust,ignore
/// struct PgLibraryRepository { pool: PgPool }
///
/// impl LibraryRepository for PgLibraryRepository {
///     async fn find_author(&self, id: Uuid) -> RepositoryResult<Option<Author>> {
///         // SELECT ... WHERE id = $1
///         todo!()
///     }
///     // ... other methods
/// }
/// ```
pub trait LibraryRepository: Send + Sync {
    /// One page of authors, filtered then sorted then sliced
    fn list_authors(
        &self,
        query: &AuthorQuery,
    ) -> impl Future<Output = RepositoryResult<Page<Author>>> + Send;

    /// Find an author by id
    fn find_author(&self, id: Uuid) -> impl Future<Output = RepositoryResult<Option<Author>>> + Send;

    /// Authors for each id that exists, in the order the ids were given
    fn find_authors(
        &self,
        ids: &[Uuid],
    ) -> impl Future<Output = RepositoryResult<Vec<Author>>> + Send;

    /// Whether an author exists
    fn author_exists(&self, id: Uuid) -> impl Future<Output = RepositoryResult<bool>> + Send;

    /// Store a new author together with its books
    ///
    /// Fails with `AlreadyExists` if the id is taken.
    fn add_author(&self, author: Author) -> impl Future<Output = RepositoryResult<Author>> + Send;

    /// Store every author or none of them
    fn add_authors(
        &self,
        authors: Vec<Author>,
    ) -> impl Future<Output = RepositoryResult<Vec<Author>>> + Send;

    /// Remove an author and its books; `false` if there was nothing to remove
    fn delete_author(&self, id: Uuid) -> impl Future<Output = RepositoryResult<bool>> + Send;

    /// Books written by `author_id`
    fn books_for_author(
        &self,
        author_id: Uuid,
    ) -> impl Future<Output = RepositoryResult<Vec<Book>>> + Send;

    /// One book, only if it belongs to `author_id`
    fn find_book_for_author(
        &self,
        author_id: Uuid,
        book_id: Uuid,
    ) -> impl Future<Output = RepositoryResult<Option<Book>>> + Send;

    /// Store a new book for `author_id`
    ///
    /// The book's `author_id` is overwritten. Fails with `NotFound` for an
    /// unknown author and `AlreadyExists` if the book id is taken.
    fn add_book_for_author(
        &self,
        author_id: Uuid,
        book: Book,
    ) -> impl Future<Output = RepositoryResult<Book>> + Send;

    /// Replace a stored book; `NotFound` if it is not there
    fn update_book(&self, book: Book) -> impl Future<Output = RepositoryResult<Book>> + Send;

    /// Remove one of an author's books; `false` if there was nothing to remove
    fn delete_book(
        &self,
        author_id: Uuid,
        book_id: Uuid,
    ) -> impl Future<Output = RepositoryResult<bool>> + Send;
}
