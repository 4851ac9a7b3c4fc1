//! Sort-key mapping tables
//!
//! A [`PropertyMapping`] is the table for one (resource, entity) pair. Each
//! client-facing sort key expands to one or more store properties, each with
//! a `reverse` flag for keys whose natural order runs opposite to the stored
//! value (sorting authors by age means sorting birth dates the other way).
//!
//! # Example
//!
//! ```rust
//! use library_api::mapping::{PropertyMapping, SortTerm};
//! use library_api::repository::OrderDirection;
//!
//! let mapping = PropertyMapping::new()
//!     .map("name", [("firstName", false), ("lastName", false)]);
//!
//! assert!(mapping.is_valid_sort("name desc"));
//! assert_eq!(
//!     mapping.translate_sort("name desc"),
//!     Some(vec![
//!         SortTerm::new("firstName", OrderDirection::Descending),
//!         SortTerm::new("lastName", OrderDirection::Descending),
//!     ])
//! );
//! ```

use std::collections::HashMap;

use super::MappingError;
use crate::repository::OrderDirection;

/// One backing-store property a sort key expands to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortTarget {
    /// Store-side property name
    pub property: String,
    /// Invert the requested direction for this property
    pub reverse: bool,
}

/// A client sort key and the store properties it expands to, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortMapping {
    client_key: String,
    targets: Vec<SortTarget>,
}

impl SortMapping {
    /// The client-facing key as declared
    pub fn client_key(&self) -> &str {
        &self.client_key
    }

    /// Store properties in expansion order
    pub fn targets(&self) -> &[SortTarget] {
        &self.targets
    }
}

/// A store property with its effective direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortTerm {
    /// Store-side property name
    pub property: String,
    /// Direction after applying the mapping's reverse flag
    pub direction: OrderDirection,
}

impl SortTerm {
    /// Create a sort term
    pub fn new(property: impl Into<String>, direction: OrderDirection) -> Self {
        Self {
            property: property.into(),
            direction,
        }
    }
}

/// A parsed `orderBy` clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SortClause<'a> {
    key: &'a str,
    descending: bool,
}

/// Split an `orderBy` string into clauses.
///
/// Empty clauses (doubled commas, trailing commas) are skipped. A trailing
/// ` desc` or ` asc` suffix is matched case-insensitively and removed from
/// the key.
fn parse_clauses(order_by: &str) -> Vec<SortClause<'_>> {
    order_by
        .split(',')
        .map(str::trim)
        .filter(|clause| !clause.is_empty())
        .map(|clause| {
            let lower = clause.to_ascii_lowercase();
            if lower.ends_with(" desc") {
                SortClause {
                    key: clause[..clause.len() - 5].trim_end(),
                    descending: true,
                }
            } else if lower.ends_with(" asc") {
                SortClause {
                    key: clause[..clause.len() - 4].trim_end(),
                    descending: false,
                }
            } else {
                SortClause {
                    key: clause,
                    descending: false,
                }
            }
        })
        .collect()
}

/// Sort-key table for one (resource, entity) pair
///
/// Keys are matched case-insensitively. Declarations are checked when the
/// table is registered, see [`PropertyMapping::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyMapping {
    mappings: Vec<SortMapping>,
    index: HashMap<String, usize>,
}

impl PropertyMapping {
    /// Create an empty table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a sort key
    ///
    /// A repeated key is kept so that [`validate`](Self::validate) can
    /// report it; lookups use the first declaration.
    #[must_use]
    pub fn map<I, P>(mut self, client_key: impl Into<String>, targets: I) -> Self
    where
        I: IntoIterator<Item = (P, bool)>,
        P: Into<String>,
    {
        let client_key = client_key.into();
        let targets = targets
            .into_iter()
            .map(|(property, reverse)| SortTarget {
                property: property.into(),
                reverse,
            })
            .collect();

        self.index
            .entry(client_key.to_lowercase())
            .or_insert(self.mappings.len());
        self.mappings.push(SortMapping {
            client_key,
            targets,
        });
        self
    }

    /// Check the declaration invariants: unique keys, non-empty targets
    pub fn validate(&self) -> Result<(), MappingError> {
        for (position, mapping) in self.mappings.iter().enumerate() {
            if mapping.targets.is_empty() {
                return Err(MappingError::EmptyTargets {
                    key: mapping.client_key.clone(),
                });
            }
            if self.index.get(&mapping.client_key.to_lowercase()) != Some(&position) {
                return Err(MappingError::DuplicateKey {
                    key: mapping.client_key.clone(),
                });
            }
        }
        Ok(())
    }

    /// Look up a sort key, case-insensitively
    pub fn get(&self, client_key: &str) -> Option<&SortMapping> {
        self.index
            .get(&client_key.to_lowercase())
            .and_then(|&position| self.mappings.get(position))
    }

    /// Declared mappings in declaration order
    pub fn mappings(&self) -> &[SortMapping] {
        &self.mappings
    }

    /// Whether every clause of `order_by` names a known key
    ///
    /// Empty and whitespace-only strings are invalid.
    pub fn is_valid_sort(&self, order_by: &str) -> bool {
        let clauses = parse_clauses(order_by);
        !clauses.is_empty() && clauses.iter().all(|clause| self.get(clause.key).is_some())
    }

    /// Expand `order_by` into store sort terms
    ///
    /// Each target's direction is the requested direction flipped when the
    /// target is marked `reverse`. Returns `None` when the string would fail
    /// [`is_valid_sort`](Self::is_valid_sort).
    pub fn translate_sort(&self, order_by: &str) -> Option<Vec<SortTerm>> {
        let clauses = parse_clauses(order_by);
        if clauses.is_empty() {
            return None;
        }

        let mut terms = Vec::new();
        for clause in clauses {
            let mapping = self.get(clause.key)?;
            for target in &mapping.targets {
                let descending = clause.descending ^ target.reverse;
                let direction = if descending {
                    OrderDirection::Descending
                } else {
                    OrderDirection::Ascending
                };
                terms.push(SortTerm::new(target.property.clone(), direction));
            }
        }
        Some(terms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author_mapping() -> PropertyMapping {
        PropertyMapping::new()
            .map("id", [("id", false)])
            .map("genre", [("genre", false)])
            .map("age", [("dateOfBirth", true)])
            .map("name", [("firstName", false), ("lastName", false)])
    }

    #[test]
    fn test_parse_clauses() {
        let clauses = parse_clauses(" name desc , age,,genre ASC ");
        assert_eq!(
            clauses,
            vec![
                SortClause { key: "name", descending: true },
                SortClause { key: "age", descending: false },
                SortClause { key: "genre", descending: false },
            ]
        );
    }

    #[test]
    fn test_valid_sort_is_case_insensitive() {
        let mapping = author_mapping();
        assert!(mapping.is_valid_sort("Name"));
        assert!(mapping.is_valid_sort("GENRE DESC"));
        assert!(mapping.is_valid_sort("name, age desc"));
    }

    #[test]
    fn test_invalid_sort_strings() {
        let mapping = author_mapping();
        assert!(!mapping.is_valid_sort(""));
        assert!(!mapping.is_valid_sort("   "));
        assert!(!mapping.is_valid_sort(" , ,"));
        assert!(!mapping.is_valid_sort("title"));
        assert!(!mapping.is_valid_sort("name, title desc"));
        assert!(!mapping.is_valid_sort("name sideways"));
    }

    #[test]
    fn test_doubled_commas_are_skipped() {
        let mapping = author_mapping();
        assert!(mapping.is_valid_sort("name,,genre"));
        assert_eq!(mapping.translate_sort("name,,genre").map(|t| t.len()), Some(3));
    }

    #[test]
    fn test_translate_expands_composite_key() {
        let mapping = author_mapping();
        assert_eq!(
            mapping.translate_sort("name desc"),
            Some(vec![
                SortTerm::new("firstName", OrderDirection::Descending),
                SortTerm::new("lastName", OrderDirection::Descending),
            ])
        );
    }

    #[test]
    fn test_translate_applies_reverse_flag() {
        let mapping = author_mapping();
        assert_eq!(
            mapping.translate_sort("age"),
            Some(vec![SortTerm::new("dateOfBirth", OrderDirection::Descending)])
        );
        assert_eq!(
            mapping.translate_sort("age desc"),
            Some(vec![SortTerm::new("dateOfBirth", OrderDirection::Ascending)])
        );
    }

    #[test]
    fn test_translate_keeps_clause_order() {
        let mapping = author_mapping();
        let terms = mapping.translate_sort("genre, name").unwrap();
        let properties: Vec<&str> = terms.iter().map(|t| t.property.as_str()).collect();
        assert_eq!(properties, vec!["genre", "firstName", "lastName"]);
    }

    #[test]
    fn test_translate_length_covers_every_clause() {
        let mapping = author_mapping();
        for order_by in ["id", "name", "genre desc, age", "age, name desc, id"] {
            let clause_count = order_by.split(',').count();
            let terms = mapping.translate_sort(order_by).unwrap();
            assert!(!terms.is_empty());
            assert!(terms.len() >= clause_count, "{order_by}");
        }
    }

    #[test]
    fn test_translate_rejects_unknown_key() {
        let mapping = author_mapping();
        assert_eq!(mapping.translate_sort("name, title"), None);
        assert_eq!(mapping.translate_sort(""), None);
    }

    #[test]
    fn test_validate_rejects_duplicate_key() {
        let mapping = PropertyMapping::new()
            .map("name", [("firstName", false)])
            .map("NAME", [("lastName", false)]);
        assert_eq!(
            mapping.validate(),
            Err(MappingError::DuplicateKey {
                key: "NAME".to_string()
            })
        );
    }

    #[test]
    fn test_validate_rejects_empty_targets() {
        let mapping = PropertyMapping::new().map("name", Vec::<(&str, bool)>::new());
        assert_eq!(
            mapping.validate(),
            Err(MappingError::EmptyTargets {
                key: "name".to_string()
            })
        );
    }

    #[test]
    fn test_get_returns_declared_key() {
        let mapping = author_mapping();
        let entry = mapping.get("AGE").unwrap();
        assert_eq!(entry.client_key(), "age");
        assert_eq!(
            entry.targets(),
            &[SortTarget {
                property: "dateOfBirth".to_string(),
                reverse: true
            }]
        );
    }
}
