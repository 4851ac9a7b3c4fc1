//! Query parameters for collection endpoints
//!
//! [`ResourceQuery`] is what axum's `Query` extractor binds, with every
//! parameter optional. [`ResourceParameters`] is the bound contract the rest
//! of the request works with: page number and size clamped, sort defaulted.
//!
//! # Example
//!
//! ```rust
//! use library_api::config::PagingConfig;
//! use library_api::handlers::{ResourceParameters, ResourceQuery};
//!
//! let query = ResourceQuery::default()
//!     .with_page_number(2)
//!     .with_page_size(500)
//!     .with_genre("Fantasy");
//!
//! let params = ResourceParameters::bind(query, &PagingConfig::default());
//! assert_eq!(params.page_number, 2);
//! assert_eq!(params.page_size, 20);
//! assert_eq!(params.order_by, "name");
//! ```

use serde::{Deserialize, Serialize};

use crate::config::PagingConfig;
use crate::repository::{AuthorFilter, PageRequest};

/// Raw collection query string, as sent by the client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<String>,
}

impl ResourceQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_page_number(mut self, page_number: u64) -> Self {
        self.page_number = Some(page_number);
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = Some(page_size);
        self
    }

    #[must_use]
    pub fn with_order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    #[must_use]
    pub fn with_search_query(mut self, search_query: impl Into<String>) -> Self {
        self.search_query = Some(search_query.into());
        self
    }

    #[must_use]
    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    #[must_use]
    pub fn with_fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = Some(fields.into());
        self
    }
}

/// Query string of single-resource reads: just the field list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<String>,
}

impl FieldsQuery {
    pub fn new(fields: impl Into<String>) -> Self {
        Self {
            fields: Some(fields.into()),
        }
    }

    pub fn fields(&self) -> Option<&str> {
        self.fields.as_deref()
    }
}

/// Bound collection parameters for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceParameters {
    /// At least 1
    pub page_number: u64,
    /// Within `[1, max_page_size]`
    pub page_size: u64,
    /// Client sort string; an explicitly empty value is kept so it can be rejected
    pub order_by: String,
    pub search_query: Option<String>,
    pub genre: Option<String>,
    pub fields: Option<String>,
}

impl ResourceParameters {
    /// Apply defaults and bounds to a raw query
    ///
    /// Page numbers below 1 become 1 and page sizes are clamped into
    /// `[1, max_page_size]`. A missing `orderBy` takes the configured default.
    #[must_use]
    pub fn bind(query: ResourceQuery, paging: &PagingConfig) -> Self {
        let max_page_size = paging.max_page_size.max(1);
        Self {
            page_number: query.page_number.unwrap_or(1).max(1),
            page_size: query
                .page_size
                .unwrap_or(paging.default_page_size)
                .clamp(1, max_page_size),
            order_by: query
                .order_by
                .unwrap_or_else(|| paging.default_order_by.clone()),
            search_query: query.search_query,
            genre: query.genre,
            fields: query.fields,
        }
    }

    /// Copy with only the page number changed
    #[must_use]
    pub fn with_page_number(&self, page_number: u64) -> Self {
        Self {
            page_number,
            ..self.clone()
        }
    }

    /// The page to fetch
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page_number, self.page_size)
    }

    /// Collection restrictions from `genre` and `searchQuery`
    pub fn filter(&self) -> AuthorFilter {
        AuthorFilter {
            genre: self.genre.clone(),
            search_query: self.search_query.clone(),
        }
    }

    /// The field list, if one was given
    pub fn fields(&self) -> Option<&str> {
        self.fields.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bind(query: ResourceQuery) -> ResourceParameters {
        ResourceParameters::bind(query, &PagingConfig::default())
    }

    #[test]
    fn test_defaults() {
        let params = bind(ResourceQuery::new());
        assert_eq!(params.page_number, 1);
        assert_eq!(params.page_size, 10);
        assert_eq!(params.order_by, "name");
        assert!(params.fields.is_none());
    }

    #[test]
    fn test_bounds() {
        assert_eq!(bind(ResourceQuery::new().with_page_size(0)).page_size, 1);
        assert_eq!(bind(ResourceQuery::new().with_page_size(21)).page_size, 20);
        assert_eq!(bind(ResourceQuery::new().with_page_size(20)).page_size, 20);
        assert_eq!(bind(ResourceQuery::new().with_page_number(0)).page_number, 1);
        assert_eq!(bind(ResourceQuery::new().with_page_number(9)).page_number, 9);
    }

    #[test]
    fn test_explicit_empty_order_by_is_kept() {
        let params = bind(ResourceQuery::new().with_order_by(""));
        assert_eq!(params.order_by, "");
    }

    #[test]
    fn test_deserialize_camel_case() {
        let query: ResourceQuery = serde_json::from_value(serde_json::json!({
            "pageNumber": 3,
            "pageSize": 5,
            "orderBy": "age desc",
            "searchQuery": "king",
            "fields": "id,name"
        }))
        .unwrap();
        let params = bind(query);
        assert_eq!(params.page_request(), PageRequest::new(3, 5));
        assert_eq!(params.order_by, "age desc");
        assert_eq!(params.filter().search_query.as_deref(), Some("king"));
        assert_eq!(params.fields(), Some("id,name"));
    }

    #[test]
    fn test_with_page_number_leaves_original() {
        let params = bind(ResourceQuery::new().with_page_number(2).with_genre("Horror"));
        let next = params.with_page_number(3);
        assert_eq!(params.page_number, 2);
        assert_eq!(next.page_number, 3);
        assert_eq!(next.genre, params.genre);
        assert_eq!(next.page_size, params.page_size);
    }
}
