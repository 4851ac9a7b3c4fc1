//! Hypermedia link construction
//!
//! [`LinkBuilder`] knows the public base URL and the API's paths, and builds
//! the `(href, rel, method)` triples attached to hypermedia responses. It is
//! deterministic: the same inputs always give the same links in the same
//! order. Whether links are attached at all is decided by the caller.

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use super::query::ResourceParameters;
use crate::config::LinkConfig;
use crate::error::Result;

const AUTHORS_PATH: &str = "/api/authors";
const AUTHOR_COLLECTIONS_PATH: &str = "/api/authorcollections";

/// A hypermedia link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    pub rel: String,
    pub method: String,
}

impl Link {
    pub fn new(href: impl Into<String>, rel: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            rel: rel.into(),
            method: method.into(),
        }
    }
}

/// Builds hrefs and link sets for authors and books
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkBuilder {
    base: Url,
}

impl LinkBuilder {
    /// Build on `base`; any path on it becomes a prefix of every href
    pub fn new(base: Url) -> Self {
        Self { base }
    }

    /// Build on the configured base URL
    pub fn from_config(config: &LinkConfig) -> Result<Self> {
        Ok(Self::new(config.parsed_base_url()?))
    }

    fn non_blank(value: Option<&str>) -> Option<&str> {
        value.map(str::trim).filter(|value| !value.is_empty())
    }

    fn url(&self, path: &str, query: &[(&str, String)]) -> String {
        let mut url = self.base.clone();
        let prefix = self.base.path().trim_end_matches('/');
        url.set_path(&format!("{prefix}{path}"));
        url.set_query(None);
        url.set_fragment(None);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        url.to_string()
    }

    /// `/api/authors/{id}`, carrying `fields` when a field list was given
    pub fn author_url(&self, id: Uuid, fields: Option<&str>) -> String {
        let query: Vec<(&str, String)> = Self::non_blank(fields)
            .map(|fields| ("fields", fields.to_string()))
            .into_iter()
            .collect();
        self.url(&format!("{AUTHORS_PATH}/{id}"), &query)
    }

    /// `/api/authors` for the given parameters
    pub fn authors_url(&self, params: &ResourceParameters) -> String {
        let mut query = vec![("orderBy", params.order_by.clone())];
        if let Some(search_query) = Self::non_blank(params.search_query.as_deref()) {
            query.push(("searchQuery", search_query.to_string()));
        }
        if let Some(genre) = Self::non_blank(params.genre.as_deref()) {
            query.push(("genre", genre.to_string()));
        }
        if let Some(fields) = Self::non_blank(params.fields()) {
            query.push(("fields", fields.to_string()));
        }
        query.push(("pageNumber", params.page_number.to_string()));
        query.push(("pageSize", params.page_size.to_string()));
        self.url(AUTHORS_PATH, &query)
    }

    /// Link to the page before `params`' page, same parameters otherwise
    pub fn previous_page_url(&self, params: &ResourceParameters) -> String {
        self.authors_url(&params.with_page_number(params.page_number.saturating_sub(1)))
    }

    /// Link to the page after `params`' page, same parameters otherwise
    pub fn next_page_url(&self, params: &ResourceParameters) -> String {
        self.authors_url(&params.with_page_number(params.page_number.saturating_add(1)))
    }

    /// `/api/authorcollections/(id1,id2,...)`
    pub fn author_collection_url(&self, ids: &[Uuid]) -> String {
        let ids: Vec<String> = ids.iter().map(Uuid::to_string).collect();
        self.url(&format!("{AUTHOR_COLLECTIONS_PATH}/({})", ids.join(",")), &[])
    }

    /// `/api/authors/{author_id}/books`
    pub fn books_url(&self, author_id: Uuid) -> String {
        self.url(&format!("{AUTHORS_PATH}/{author_id}/books"), &[])
    }

    /// `/api/authors/{author_id}/books/{book_id}`
    pub fn book_url(&self, author_id: Uuid, book_id: Uuid) -> String {
        self.url(&format!("{AUTHORS_PATH}/{author_id}/books/{book_id}"), &[])
    }

    /// Links for one author
    ///
    /// `self` keeps the field list so following it returns the same
    /// projection.
    pub fn author_links(&self, id: Uuid, fields: Option<&str>) -> Vec<Link> {
        vec![
            Link::new(self.author_url(id, fields), "self", "GET"),
            Link::new(self.author_url(id, None), "delete_author", "DELETE"),
            Link::new(self.books_url(id), "create_book_for_author", "POST"),
            Link::new(self.books_url(id), "books", "GET"),
        ]
    }

    /// Links for a page of authors
    ///
    /// `nextPage` only when there is a next page and `previousPage` only when
    /// there is a previous one.
    pub fn authors_links(
        &self,
        params: &ResourceParameters,
        has_next: bool,
        has_previous: bool,
    ) -> Vec<Link> {
        let mut links = vec![Link::new(self.authors_url(params), "self", "GET")];
        if has_next {
            links.push(Link::new(self.next_page_url(params), "nextPage", "GET"));
        }
        if has_previous {
            links.push(Link::new(
                self.previous_page_url(params),
                "previousPage",
                "GET",
            ));
        }
        links
    }

    /// Links for one book
    pub fn book_links(&self, author_id: Uuid, book_id: Uuid) -> Vec<Link> {
        let href = self.book_url(author_id, book_id);
        vec![
            Link::new(href.clone(), "self", "GET"),
            Link::new(href.clone(), "delete_book", "DELETE"),
            Link::new(href.clone(), "update_book", "PUT"),
            Link::new(href, "partially_update_book", "PATCH"),
        ]
    }

    /// Links for an author's book list
    pub fn books_links(&self, author_id: Uuid) -> Vec<Link> {
        vec![Link::new(self.books_url(author_id), "self", "GET")]
    }
}
