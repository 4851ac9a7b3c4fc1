//! Multi-column in-memory ordering by translated sort terms

use std::cmp::Ordering;

use super::error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
use super::pagination::OrderDirection;
use crate::mapping::SortTerm;

/// An entity that can be ordered by named store properties
pub trait Sortable {
    /// Whether `property` names something [`compare_property`](Self::compare_property) understands
    fn has_property(property: &str) -> bool;

    /// Ascending comparison of one property
    fn compare_property(&self, other: &Self, property: &str) -> Ordering;
}

/// Stable sort by each term in turn; later terms only break ties
///
/// Fails without touching `items` when a term names a property `T` does not
/// have.
pub fn sort_by_terms<T: Sortable>(items: &mut [T], terms: &[SortTerm]) -> Result<(), RepositoryError> {
    if let Some(unknown) = terms.iter().find(|term| !T::has_property(&term.property)) {
        return Err(RepositoryError::new(
            RepositoryOperation::FindAll,
            RepositoryErrorKind::InvalidSort,
            format!("Cannot sort by unknown property '{}'", unknown.property),
        ));
    }

    items.sort_by(|left, right| {
        terms
            .iter()
            .map(|term| {
                let ordering = left.compare_property(right, &term.property);
                match term.direction {
                    OrderDirection::Ascending => ordering,
                    OrderDirection::Descending => ordering.reverse(),
                }
            })
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        group: u8,
        rank: u8,
        tag: char,
    }

    impl Sortable for Row {
        fn has_property(property: &str) -> bool {
            matches!(property, "group" | "rank")
        }

        fn compare_property(&self, other: &Self, property: &str) -> Ordering {
            match property {
                "group" => self.group.cmp(&other.group),
                "rank" => self.rank.cmp(&other.rank),
                _ => Ordering::Equal,
            }
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { group: 2, rank: 1, tag: 'a' },
            Row { group: 1, rank: 2, tag: 'b' },
            Row { group: 2, rank: 3, tag: 'c' },
            Row { group: 1, rank: 2, tag: 'd' },
        ]
    }

    fn tags(rows: &[Row]) -> String {
        rows.iter().map(|row| row.tag).collect()
    }

    #[test]
    fn test_sort_single_term() {
        let mut rows = rows();
        sort_by_terms(&mut rows, &[SortTerm::new("rank", OrderDirection::Ascending)]).unwrap();
        assert_eq!(tags(&rows), "abdc");
    }

    #[test]
    fn test_later_terms_break_ties() {
        let mut rows = rows();
        sort_by_terms(
            &mut rows,
            &[
                SortTerm::new("group", OrderDirection::Ascending),
                SortTerm::new("rank", OrderDirection::Descending),
            ],
        )
        .unwrap();
        assert_eq!(tags(&rows), "bdca");
    }

    #[test]
    fn test_sort_is_stable() {
        let mut rows = rows();
        sort_by_terms(&mut rows, &[SortTerm::new("group", OrderDirection::Descending)]).unwrap();
        assert_eq!(tags(&rows), "acbd");
    }

    #[test]
    fn test_unknown_property_leaves_items_alone() {
        let mut rows = rows();
        let err = sort_by_terms(&mut rows, &[SortTerm::new("colour", OrderDirection::Ascending)])
            .unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::InvalidSort);
        assert_eq!(rows, self::rows());
    }
}
