//! # library-api
//!
//! Core of a library catalog REST API (authors and their books): sort-key
//! mapping, field projection, paging and hypermedia links, plus the axum
//! handlers built on them.
//!
//! ## Features
//!
//! - **Sort mapping**: client sort keys validated and translated into one or
//!   more store sort terms, with per-target direction flips
//! - **Data shaping**: `?fields=` projections over per-type accessor tables,
//!   identifier always included
//! - **Paging**: filter, sort, count and slice, with page metadata in an
//!   `X-Pagination` header
//! - **Hypermedia**: item and collection links when the client asks for the
//!   hypermedia media type
//! - **Upserts**: `PUT` and JSON Patch on books create a missing book
//!
//! ## Example
//!
//! ```rust,no_run
//! use library_api::prelude::*;
//!
//! fn main() -> Result<()> {
//!     // Load configuration
//!     let config = Config::load()?;
//!
//!     // Initialize tracing
//!     init_tracing(&config)?;
//!
//!     // Shared state for the handlers
//!     let state = LibraryState::new(config, InMemoryLibraryRepository::new())?;
//!     assert!(state
//!         .mappings()
//!         .is_valid_sort::<AuthorDto, Author>("age desc")?);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod mapping;
pub mod models;
pub mod observability;
pub mod patch;
pub mod repository;
pub mod responses;
pub mod shaping;
pub mod state;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{Config, LinkConfig, PagingConfig, ServiceConfig};
    pub use crate::error::{Error, Result};

    pub use crate::handlers::{
        ApiError, ApiErrorKind, ApiOperation, Link, LinkBuilder, LinkedCollection, LinkedResource,
        PaginationMetadata, ResourceParameters, ResourceQuery, ResponseShape,
    };
    pub use crate::mapping::{
        library_registry, MappingError, PropertyMapping, PropertyMappingRegistry, SortTerm,
    };
    pub use crate::models::{
        Author, AuthorDto, AuthorForCreation, Book, BookDto, BookForCreation,
        BookForManipulation, BookForUpdate,
    };
    pub use crate::observability::init_tracing;
    pub use crate::patch::{PatchDocument, PatchError, PatchOperation, Patchable};
    pub use crate::repository::{
        paginate, InMemoryLibraryRepository, LibraryRepository, OrderDirection, Page,
        PageRequest, RepositoryError,
    };
    pub use crate::responses::{Conflict, Created, FieldError, NoContent, ValidationError};
    pub use crate::shaping::{has_properties, shape, shape_all, Resource, ShapedResource};
    pub use crate::state::LibraryState;
}
