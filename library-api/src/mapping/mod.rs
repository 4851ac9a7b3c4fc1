//! Client sort keys to backing-store sort terms
//!
//! Clients sort collections with an `orderBy` string such as `"name desc, age"`.
//! The keys in that string belong to the resource the client sees, not to the
//! stored entity, so each (resource, entity) pair registers a table that
//! expands every key into one or more store properties.
//!
//! - [`PropertyMapping`]: the table for one pair, with validation and
//!   translation of `orderBy` strings
//! - [`PropertyMappingRegistry`]: all tables, keyed by type pair
//! - [`library_registry`]: the tables for the library resources
//!
//! A missing table is a [`MappingError`], which is a programming error and
//! surfaces as a 500, never as a client-correctable 400.

mod property;
mod registry;

use thiserror::Error;

pub use property::{PropertyMapping, SortMapping, SortTarget, SortTerm};
pub use registry::{PropertyMappingRegistry, PropertyMappingRegistryBuilder};

use crate::models::{Author, AuthorDto};

/// Sort mapping declaration or lookup failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// No table registered for the pair
    #[error("No sort mapping registered for {source_type} -> {target_type}")]
    NotRegistered {
        /// Client resource type
        source_type: &'static str,
        /// Entity type
        target_type: &'static str,
    },

    /// The pair was registered twice
    #[error("Sort mapping for {source_type} -> {target_type} registered twice")]
    AlreadyRegistered {
        /// Client resource type
        source_type: &'static str,
        /// Entity type
        target_type: &'static str,
    },

    /// A key was declared twice in one table
    #[error("Sort key '{key}' declared more than once")]
    DuplicateKey {
        /// The repeated key
        key: String,
    },

    /// A key was declared without store properties
    #[error("Sort key '{key}' maps to no properties")]
    EmptyTargets {
        /// The offending key
        key: String,
    },
}

/// Sort table exposed on author collections
pub fn author_mapping() -> PropertyMapping {
    PropertyMapping::new()
        .map("id", [("id", false)])
        .map("genre", [("genre", false)])
        .map("age", [("dateOfBirth", true)])
        .map("name", [("firstName", false), ("lastName", false)])
}

/// Registry holding every table the library API sorts with
pub fn library_registry() -> Result<PropertyMappingRegistry, MappingError> {
    Ok(PropertyMappingRegistry::builder()
        .register::<AuthorDto, Author>(author_mapping())?
        .build())
}
