//! Field projection of resources into ordered JSON objects

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use super::fields::{requested_fields, Resource};

/// A resource reduced to a chosen set of fields
///
/// Keys keep insertion order: the identifier first, then the requested fields
/// in the order they were asked for. Serializes as a plain JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapedResource {
    id_field: &'static str,
    values: Map<String, Value>,
}

impl ShapedResource {
    /// Name of the identifier field carried by this projection
    pub fn id_field(&self) -> &'static str {
        self.id_field
    }

    /// The identifier value
    pub fn id(&self) -> Option<&Value> {
        self.values.get(self.id_field)
    }

    /// Value of a field by its exact name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Field names in output order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no fields were projected
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Project this projection again
    ///
    /// Field names match case-insensitively against the keys already present,
    /// so shaping a shaped resource with the same list gives the same result.
    #[must_use]
    pub fn project(&self, fields: Option<&str>) -> ShapedResource {
        let Some(tokens) = requested_fields(fields) else {
            return self.clone();
        };

        let mut values = Map::new();
        if let Some(id) = self.id() {
            values.insert(self.id_field.to_string(), id.clone());
        }
        for token in tokens {
            if let Some((name, value)) = self
                .values
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(token))
            {
                values.insert(name.clone(), value.clone());
            }
        }

        ShapedResource {
            id_field: self.id_field,
            values,
        }
    }

    /// Take the underlying JSON object
    pub fn into_map(self) -> Map<String, Value> {
        self.values
    }
}

impl Serialize for ShapedResource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.values.serialize(serializer)
    }
}

/// Project `resource` onto the fields named in `fields`
///
/// `None` or an empty list yields every field in declaration order.
/// Otherwise the identifier comes first, followed by each requested field in
/// request order; repeats collapse onto the first occurrence. Names `T` does
/// not declare are skipped, so callers validate first with
/// [`has_properties`](super::has_properties).
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use library_api::models::{Author, AuthorDto};
/// use library_api::shaping::shape;
///
/// let author = Author::new(
///     "Stephen",
///     "King",
///     NaiveDate::from_ymd_opt(1947, 9, 21).unwrap(),
///     "Horror",
/// );
/// let today = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
/// let dto = AuthorDto::from_author(&author, today);
///
/// let shaped = shape(&dto, Some("genre"));
/// assert_eq!(shaped.keys().collect::<Vec<_>>(), vec!["id", "genre"]);
/// ```
pub fn shape<T: Resource>(resource: &T, fields: Option<&str>) -> ShapedResource {
    let table = T::field_table();
    let mut values = Map::new();

    match requested_fields(fields) {
        None => {
            for (name, getter) in table.iter() {
                values.insert(name.to_string(), getter(resource));
            }
        }
        Some(tokens) => {
            if let Some((name, getter)) = table.get(table.id_field()) {
                values.insert(name.to_string(), getter(resource));
            }
            for token in tokens {
                if let Some((name, getter)) = table.get(token) {
                    if !values.contains_key(name) {
                        values.insert(name.to_string(), getter(resource));
                    }
                }
            }
        }
    }

    ShapedResource {
        id_field: table.id_field(),
        values,
    }
}

/// [`shape`] applied to each resource, keeping input order
pub fn shape_all<'a, T, I>(resources: I, fields: Option<&str>) -> Vec<ShapedResource>
where
    T: Resource + 'a,
    I: IntoIterator<Item = &'a T>,
{
    resources
        .into_iter()
        .map(|resource| shape(resource, fields))
        .collect()
}
