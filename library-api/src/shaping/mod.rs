//! Field selection and projection of client resources
//!
//! Clients may ask for a subset of a resource's fields with a `fields` query
//! parameter (`?fields=name,genre`). Each resource type exposes a
//! [`FieldTable`] of named accessors through the [`Resource`] trait; that
//! table is used to validate the request ([`has_properties`]) and to build
//! the reduced JSON object ([`shape`]).

mod fields;
mod projector;

pub use fields::{has_properties, FieldGetter, FieldTable, Resource};
pub use projector::{shape, shape_all, ShapedResource};
