//! Storage abstraction for the library catalogue
//!
//! # Features
//!
//! - **Repository trait**: [`LibraryRepository`] for author and book storage
//! - **In-memory store**: [`InMemoryLibraryRepository`] for tests and demos
//! - **Filtering**: [`AuthorFilter`] for genre and free-text restrictions
//! - **Sorting**: [`Sortable`] and [`sort_by_terms`] for translated sort terms
//! - **Paging**: [`Page`] and [`paginate`] for page arithmetic
//!
//! Collection queries always run filter, then sort, then count, then slice.
//!
//! # Example
//!
//! ```rust
//! use library_api::mapping::author_mapping;
//! use library_api::repository::{
//!     AuthorFilter, AuthorQuery, InMemoryLibraryRepository, LibraryRepository, PageRequest,
//! };
//!
//! # tokio_test_block(async {
//! let repo = InMemoryLibraryRepository::new();
//! let query = AuthorQuery {
//!     filter: AuthorFilter::default().with_genre("Fantasy"),
//!     sort: author_mapping().translate_sort("name").unwrap_or_default(),
//!     page: PageRequest::new(1, 10),
//! };
//! let page = repo.list_authors(&query).await.unwrap();
//! assert_eq!(page.total_count, 0);
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

mod error;
mod filter;
mod memory;
mod pagination;
mod sort;
mod traits;

pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use filter::{AuthorFilter, AuthorQuery};
pub use memory::InMemoryLibraryRepository;
pub use pagination::{paginate, total_pages, OrderDirection, Page, PageRequest};
pub use sort::{sort_by_terms, Sortable};
pub use traits::{LibraryRepository, RepositoryResult};
