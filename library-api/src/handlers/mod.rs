//! HTTP handlers for authors, author collections and books
//!
//! Handlers are plain async functions over axum extractors and a
//! [`LibraryState`](crate::state::LibraryState); the host service decides
//! the routes. The paths the handlers document and link to are:
//!
//! | Route | Handler |
//! |---|---|
//! | `GET /api/authors` | [`list_authors`] |
//! | `POST /api/authors` | [`create_author`] |
//! | `GET /api/authors/{id}` | [`get_author`] |
//! | `POST /api/authors/{id}` | [`block_author_creation`] |
//! | `DELETE /api/authors/{id}` | [`delete_author`] |
//! | `POST /api/authorcollections` | [`create_author_collection`] |
//! | `GET /api/authorcollections/{ids}`, `ids` = `(id1,id2,...)` | [`get_author_collection`] |
//! | `GET /api/authors/{id}/books` | [`list_books_for_author`] |
//! | `POST /api/authors/{id}/books` | [`create_book_for_author`] |
//! | `GET /api/authors/{id}/books/{book_id}` | [`get_book_for_author`] |
//! | `PUT /api/authors/{id}/books/{book_id}` | [`update_book_for_author`] |
//! | `PATCH /api/authors/{id}/books/{book_id}` | [`partially_update_book_for_author`] |
//! | `DELETE /api/authors/{id}/books/{book_id}` | [`delete_book_for_author`] |
//!
//! # Integration with Axum
//!
//! ```rust,ignore
//! use axum::{routing::get, Router};
//! use library_api::handlers::{get_author, list_authors};
//!
//! let app = Router::new()
//!     .route("/api/authors", get(list_authors::<InMemoryLibraryRepository>))
//!     .route("/api/authors/{id}", get(get_author::<InMemoryLibraryRepository>))
//!     .with_state(state);
//! ```
//!
//! Responses come in two shapes, picked per request from the `Accept`
//! header (see [`ResponseShape`]).

mod author_collections;
mod authors;
mod books;
mod error;
mod links;
mod query;
mod response;

#[cfg(test)]
mod testing;

pub use author_collections::{create_author_collection, get_author_collection, parse_id_list};
pub use authors::{block_author_creation, create_author, delete_author, get_author, list_authors};
pub use books::{
    create_book_for_author, delete_book_for_author, get_book_for_author, list_books_for_author,
    partially_update_book_for_author, update_book_for_author,
};
pub use error::{ApiError, ApiErrorKind, ApiOperation};
pub use links::{Link, LinkBuilder};
pub use query::{FieldsQuery, ResourceParameters, ResourceQuery};
pub use response::{
    LinkedCollection, LinkedResource, PageLinks, PagedResponse, PaginationMetadata, ResponseShape,
    X_PAGINATION,
};
