//! Response shapes for library handlers
//!
//! A request is answered in one of two [`ResponseShape`]s, picked from the
//! `Accept` header:
//!
//! - **Plain**: the (projected) resource or page as the body; collection
//!   paging metadata, including previous/next page URLs, goes in the
//!   `X-Pagination` header.
//! - **Hypermedia**: resources wrapped with their [`Link`]s
//!   ([`LinkedResource`], [`LinkedCollection`]); `X-Pagination` still carries
//!   the counts but not the URLs, which are in the body links instead.

use axum::{
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use super::links::{Link, LinkBuilder};
use super::query::ResourceParameters;
use crate::error::{Error, Result};
use crate::repository::Page;

/// Header carrying collection paging metadata
pub static X_PAGINATION: HeaderName = HeaderName::from_static("x-pagination");

/// Which body layout to answer with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseShape {
    #[default]
    Plain,
    Hypermedia,
}

impl ResponseShape {
    /// Hypermedia when `Accept` lists `hypermedia_media_type`, plain otherwise
    ///
    /// Media type parameters (`;q=0.9`) are ignored and the comparison is
    /// case-insensitive.
    pub fn from_headers(headers: &HeaderMap, hypermedia_media_type: &str) -> Self {
        let wanted = headers
            .get_all(header::ACCEPT)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(','))
            .filter_map(|media_range| media_range.split(';').next())
            .any(|media_type| media_type.trim().eq_ignore_ascii_case(hypermedia_media_type));

        if wanted {
            Self::Hypermedia
        } else {
            Self::Plain
        }
    }

    pub fn is_hypermedia(&self) -> bool {
        matches!(self, Self::Hypermedia)
    }
}

/// A resource with its links, serialized as the resource's own fields plus `links`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkedResource<R> {
    #[serde(flatten)]
    pub resource: R,
    pub links: Vec<Link>,
}

impl<R> LinkedResource<R> {
    pub fn new(resource: R, links: Vec<Link>) -> Self {
        Self { resource, links }
    }
}

/// A collection with its links
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkedCollection<T> {
    pub value: Vec<T>,
    pub links: Vec<Link>,
}

impl<T> LinkedCollection<T> {
    pub fn new(value: Vec<T>, links: Vec<Link>) -> Self {
        Self { value, links }
    }
}

/// Previous/next page URLs reported in plain mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLinks {
    pub previous_page_link: Option<String>,
    pub next_page_link: Option<String>,
}

/// Contents of the `X-Pagination` header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMetadata {
    pub total_count: u64,
    pub page_size: u64,
    pub current_page: u64,
    pub total_pages: u64,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub page_links: Option<PageLinks>,
}

impl PaginationMetadata {
    /// Counts only, as sent with hypermedia responses
    pub fn from_page<T>(page: &Page<T>) -> Self {
        Self {
            total_count: page.total_count,
            page_size: page.page_size,
            current_page: page.current_page,
            total_pages: page.total_pages,
            page_links: None,
        }
    }

    /// Counts plus the URLs of the neighbouring pages that exist
    pub fn with_page_links<T>(page: &Page<T>, params: &ResourceParameters, links: &LinkBuilder) -> Self {
        Self {
            page_links: Some(PageLinks {
                previous_page_link: page
                    .has_previous()
                    .then(|| links.previous_page_url(params)),
                next_page_link: page.has_next().then(|| links.next_page_url(params)),
            }),
            ..Self::from_page(page)
        }
    }

    /// Serialized header value
    pub fn header_value(&self) -> Result<HeaderValue> {
        let json = serde_json::to_string(self)
            .map_err(|e| Error::Internal(format!("Failed to serialize paging metadata: {e}")))?;
        HeaderValue::from_str(&json)
            .map_err(|e| Error::Internal(format!("Invalid paging header: {e}")))
    }
}

/// 200 OK with a JSON body and an `X-Pagination` header
#[derive(Debug)]
pub struct PagedResponse<B> {
    body: B,
    pagination: HeaderValue,
}

impl<B> PagedResponse<B> {
    pub fn new(body: B, metadata: &PaginationMetadata) -> Result<Self> {
        Ok(Self {
            body,
            pagination: metadata.header_value()?,
        })
    }
}

impl<B: Serialize> IntoResponse for PagedResponse<B> {
    fn into_response(self) -> Response {
        let mut response = (StatusCode::OK, Json(self.body)).into_response();
        response
            .headers_mut()
            .insert(X_PAGINATION.clone(), self.pagination);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LinkConfig, PagingConfig};
    use crate::handlers::ResourceQuery;
    use crate::repository::{paginate, PageRequest};

    const HATEOAS: &str = "application/vnd.library.hateoas+json";

    fn headers(accept: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_str(accept).unwrap());
        headers
    }

    #[test]
    fn test_response_shape_from_accept() {
        assert_eq!(
            ResponseShape::from_headers(&HeaderMap::new(), HATEOAS),
            ResponseShape::Plain
        );
        assert_eq!(
            ResponseShape::from_headers(&headers("application/json"), HATEOAS),
            ResponseShape::Plain
        );
        assert_eq!(
            ResponseShape::from_headers(&headers(HATEOAS), HATEOAS),
            ResponseShape::Hypermedia
        );
        assert_eq!(
            ResponseShape::from_headers(
                &headers("application/json;q=0.5, Application/VND.library.hateoas+json;q=0.9"),
                HATEOAS
            ),
            ResponseShape::Hypermedia
        );
    }

    #[test]
    fn test_linked_resource_flattens() {
        #[derive(Serialize)]
        struct Shelf {
            id: u8,
        }

        let linked = LinkedResource::new(Shelf { id: 4 }, vec![Link::new("/s/4", "self", "GET")]);
        let json = serde_json::to_value(&linked).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 4,
                "links": [{ "href": "/s/4", "rel": "self", "method": "GET" }]
            })
        );
    }

    #[test]
    fn test_plain_metadata_has_links() {
        let links = LinkBuilder::from_config(&LinkConfig::default()).unwrap();
        let params = ResourceParameters::bind(
            ResourceQuery::new().with_page_number(1).with_page_size(10),
            &PagingConfig::default(),
        );
        let page = paginate(1..=25, PageRequest::new(1, 10));

        let metadata = PaginationMetadata::with_page_links(&page, &params, &links);
        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["totalCount"], 25);
        assert_eq!(json["totalPages"], 3);
        assert_eq!(json["previousPageLink"], serde_json::Value::Null);
        assert_eq!(
            json["nextPageLink"],
            "http://localhost:8080/api/authors?orderBy=name&pageNumber=2&pageSize=10"
        );
    }

    #[test]
    fn test_hypermedia_metadata_has_no_links() {
        let page = paginate(1..=25, PageRequest::new(2, 10));
        let json = serde_json::to_value(PaginationMetadata::from_page(&page)).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 4);
        assert!(!object.contains_key("nextPageLink"));
    }

    #[test]
    fn test_paged_response_sets_header() {
        let page = paginate(1..=3, PageRequest::new(1, 10));
        let metadata = PaginationMetadata::from_page(&page);
        let response = PagedResponse::new(page.items, &metadata)
            .unwrap()
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let header = response.headers()[&X_PAGINATION].to_str().unwrap();
        let parsed: PaginationMetadata = serde_json::from_str(header).unwrap();
        assert_eq!(parsed.total_count, 3);
        assert_eq!(parsed.total_pages, 1);
    }
}
