//! Library catalogue entities and their client-facing models
//!
//! Entities ([`Author`], [`Book`]) are what the repository stores. DTOs are
//! what clients read, and the `*ForCreation` / `*ForUpdate` types are what
//! they send. Conversions between them are plain functions on these types.

mod author;
mod book;

pub use author::{Author, AuthorDto, AuthorForCreation};
pub use book::{
    Book, BookDto, BookForCreation, BookForManipulation, BookForUpdate, MAX_DESCRIPTION_LEN,
    MAX_TITLE_LEN,
};
