//! Per-resource field accessor tables and field-list validation

use std::collections::hash_map::{Entry, HashMap};

use serde_json::Value;

/// Reads one field of a resource as a JSON value
pub type FieldGetter<T> = fn(&T) -> Value;

/// Named accessors for every public field of a resource type
///
/// Built once per type (usually in a `once_cell::sync::Lazy` static) and
/// consulted for both validation and projection. Names are matched
/// case-insensitively; the declared spelling is what ends up in responses.
pub struct FieldTable<T> {
    id_field: &'static str,
    fields: Vec<(&'static str, FieldGetter<T>)>,
    index: HashMap<String, usize>,
}

impl<T> FieldTable<T> {
    /// Start an empty table whose identifier field is `id_field`
    ///
    /// The identifier is carried by every projection, so it should also be
    /// declared with [`field`](Self::field).
    pub fn new(id_field: &'static str) -> Self {
        Self {
            id_field,
            fields: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Declare the next field; a repeated name keeps the first accessor
    #[must_use]
    pub fn field(mut self, name: &'static str, getter: FieldGetter<T>) -> Self {
        if let Entry::Vacant(entry) = self.index.entry(name.to_lowercase()) {
            entry.insert(self.fields.len());
            self.fields.push((name, getter));
        }
        self
    }

    /// Name of the identifier field
    pub fn id_field(&self) -> &'static str {
        self.id_field
    }

    /// Look up a field by name, case-insensitively
    pub fn get(&self, name: &str) -> Option<(&'static str, FieldGetter<T>)> {
        self.index
            .get(&name.to_lowercase())
            .and_then(|&position| self.fields.get(position))
            .copied()
    }

    /// Whether the table declares `name`
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(&name.to_lowercase())
    }

    /// Field names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(name, _)| *name)
    }

    /// Accessors in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, FieldGetter<T>)> + '_ {
        self.fields.iter().copied()
    }
}

impl<T> std::fmt::Debug for FieldTable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldTable")
            .field("id_field", &self.id_field)
            .field("fields", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

/// A client-facing type that can be validated against and projected by field name
pub trait Resource: Sized + 'static {
    /// The accessor table for this type
    fn field_table() -> &'static FieldTable<Self>;
}

/// Requested field names, or `None` when every field is wanted.
///
/// Empty input, whitespace, a lone `*`, and strings made only of commas all
/// select every field. Empty tokens are skipped.
pub(crate) fn requested_fields(fields: Option<&str>) -> Option<Vec<&str>> {
    let fields = fields?.trim();
    if fields == "*" {
        return None;
    }

    let tokens: Vec<&str> = fields
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect();

    if tokens.is_empty() {
        None
    } else {
        Some(tokens)
    }
}

/// Whether every field named in `fields` exists on `T`
///
/// `None` and empty strings always pass. Never panics on malformed input;
/// unknown names simply yield `false`.
///
/// # Example
///
/// ```rust
/// use library_api::models::AuthorDto;
/// use library_api::shaping::has_properties;
///
/// assert!(has_properties::<AuthorDto>(None));
/// assert!(has_properties::<AuthorDto>(Some("Name, genre")));
/// assert!(!has_properties::<AuthorDto>(Some("name, title")));
/// ```
pub fn has_properties<T: Resource>(fields: Option<&str>) -> bool {
    let table = T::field_table();
    match requested_fields(fields) {
        None => true,
        Some(tokens) => tokens.iter().all(|token| table.contains(token)),
    }
}
