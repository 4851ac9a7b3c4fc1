//! Author collection filtering

use crate::mapping::SortTerm;
use crate::models::Author;

use super::pagination::PageRequest;

/// Restrictions applied to the author collection before sorting and paging
///
/// Blank values are ignored. Both comparisons ignore case and surrounding
/// whitespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorFilter {
    /// Exact genre match
    pub genre: Option<String>,
    /// Substring of the genre, first name or last name
    pub search_query: Option<String>,
}

impl AuthorFilter {
    /// Only authors in `genre`
    #[must_use]
    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    /// Only authors matching `query`
    #[must_use]
    pub fn with_search_query(mut self, query: impl Into<String>) -> Self {
        self.search_query = Some(query.into());
        self
    }

    /// Whether `author` passes every restriction
    pub fn matches(&self, author: &Author) -> bool {
        if let Some(genre) = normalized(self.genre.as_deref()) {
            if author.genre.trim().to_lowercase() != genre {
                return false;
            }
        }

        if let Some(query) = normalized(self.search_query.as_deref()) {
            let found = [&author.genre, &author.first_name, &author.last_name]
                .iter()
                .any(|value| value.to_lowercase().contains(&query));
            if !found {
                return false;
            }
        }

        true
    }
}

fn normalized(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_lowercase)
}

/// Everything needed to fetch one page of authors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorQuery {
    pub filter: AuthorFilter,
    /// Store sort terms, already translated from the client's `orderBy`
    pub sort: Vec<SortTerm>,
    pub page: PageRequest,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn author(first: &str, last: &str, genre: &str) -> Author {
        Author::new(
            first,
            last,
            NaiveDate::from_ymd_opt(1970, 1, 1).unwrap(),
            genre,
        )
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let filter = AuthorFilter::default();
        assert!(filter.matches(&author("Any", "One", "Drama")));

        let blank = AuthorFilter::default().with_genre("  ").with_search_query("");
        assert!(blank.matches(&author("Any", "One", "Drama")));
    }

    #[test]
    fn test_genre_is_exact_ignoring_case() {
        let filter = AuthorFilter::default().with_genre(" fantasy ");
        assert!(filter.matches(&author("George", "Martin", "Fantasy")));
        assert!(!filter.matches(&author("Tom", "Lanoye", "Various")));
        assert!(!filter.matches(&author("X", "Y", "Dark Fantasy")));
    }

    #[test]
    fn test_search_covers_names_and_genre() {
        let filter = AuthorFilter::default().with_search_query("KING");
        assert!(filter.matches(&author("Stephen", "King", "Horror")));
        assert!(!filter.matches(&author("Douglas", "Adams", "Science fiction")));

        let by_genre = AuthorFilter::default().with_search_query("fic");
        assert!(by_genre.matches(&author("Douglas", "Adams", "Science fiction")));

        let by_first = AuthorFilter::default().with_search_query("doug");
        assert!(by_first.matches(&author("Douglas", "Adams", "Science fiction")));
    }

    #[test]
    fn test_filters_combine() {
        let filter = AuthorFilter::default()
            .with_genre("Horror")
            .with_search_query("ste");
        assert!(filter.matches(&author("Stephen", "King", "Horror")));
        assert!(!filter.matches(&author("Anne", "Rice", "Horror")));
    }
}
