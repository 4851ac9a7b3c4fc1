//! Author handlers: paged and shaped listing, reads, creation and deletion

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use super::error::{ApiError, ApiOperation};
use super::query::{FieldsQuery, ResourceParameters, ResourceQuery};
use super::response::{
    LinkedCollection, LinkedResource, PagedResponse, PaginationMetadata, ResponseShape,
};
use crate::models::{Author, AuthorDto, AuthorForCreation, BookForManipulation};
use crate::repository::{AuthorQuery, LibraryRepository};
use crate::responses::{Conflict, Created, NoContent, ValidationError};
use crate::shaping::{has_properties, shape, shape_all};
use crate::state::LibraryState;

pub(crate) fn response_shape<R>(state: &LibraryState<R>, headers: &HeaderMap) -> ResponseShape {
    ResponseShape::from_headers(headers, &state.config().links.hypermedia_media_type)
}

pub(crate) fn check_fields(fields: Option<&str>, operation: ApiOperation) -> Result<(), ApiError> {
    if has_properties::<AuthorDto>(fields) {
        Ok(())
    } else {
        tracing::debug!(fields = ?fields, "Rejected field list");
        Err(ApiError::bad_request(format!(
            "Unknown field in '{}'",
            fields.unwrap_or_default()
        ))
        .with_operation(operation))
    }
}

/// Validate nested books, reporting failures as `books[i].field`
pub(crate) fn validate_creation(input: &AuthorForCreation) -> Result<(), ValidationError> {
    let mut errors = ValidationError::new("Author validation failed");
    for (index, book) in input.books.iter().enumerate() {
        if let Err(book_errors) = book.validate() {
            for (field, failures) in book_errors.errors {
                errors
                    .errors
                    .entry(format!("books[{index}].{field}"))
                    .or_default()
                    .extend(failures);
            }
        }
    }

    if errors.has_errors() {
        Err(errors)
    } else {
        Ok(())
    }
}

/// `GET /api/authors`
///
/// Rejects unknown sort keys and field names with 400. Plain responses carry
/// the shaped page with paging metadata (including neighbour page URLs) in
/// `X-Pagination`; hypermedia responses wrap the page in a
/// [`LinkedCollection`].
pub async fn list_authors<R: LibraryRepository>(
    State(state): State<LibraryState<R>>,
    headers: HeaderMap,
    Query(query): Query<ResourceQuery>,
) -> Result<Response, ApiError> {
    let params = ResourceParameters::bind(query, &state.config().paging);

    if !state
        .mappings()
        .is_valid_sort::<AuthorDto, Author>(&params.order_by)?
    {
        tracing::debug!(order_by = %params.order_by, "Rejected sort");
        return Err(ApiError::bad_request(format!(
            "Cannot sort authors by '{}'",
            params.order_by
        )));
    }
    check_fields(params.fields(), ApiOperation::List)?;

    let sort = state
        .mappings()
        .translate_sort::<AuthorDto, Author>(&params.order_by)?
        .unwrap_or_default();
    let query = AuthorQuery {
        filter: params.filter(),
        sort,
        page: params.page_request(),
    };

    let page = state.repository().list_authors(&query).await?;
    let today = state.today();
    let page = page.map(|author| AuthorDto::from_author(&author, today));
    let fields = params.fields();
    let links = state.links();

    let response = match response_shape(&state, &headers) {
        ResponseShape::Hypermedia => {
            let metadata = PaginationMetadata::from_page(&page);
            let value = page
                .items
                .iter()
                .map(|dto| LinkedResource::new(shape(dto, fields), links.author_links(dto.id, fields)))
                .collect();
            let body = LinkedCollection::new(
                value,
                links.authors_links(&params, page.has_next(), page.has_previous()),
            );
            PagedResponse::new(body, &metadata)?.into_response()
        }
        ResponseShape::Plain => {
            let metadata = PaginationMetadata::with_page_links(&page, &params, links);
            PagedResponse::new(shape_all(&page.items, fields), &metadata)?.into_response()
        }
    };

    Ok(response)
}

/// `GET /api/authors/{id}`
pub async fn get_author<R: LibraryRepository>(
    State(state): State<LibraryState<R>>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Query(query): Query<FieldsQuery>,
) -> Result<Response, ApiError> {
    let fields = query.fields();
    check_fields(fields, ApiOperation::Get)?;

    let author = state
        .repository()
        .find_author(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Author", id.to_string()))?;
    let shaped = shape(&AuthorDto::from_author(&author, state.today()), fields);

    let response = match response_shape(&state, &headers) {
        ResponseShape::Hypermedia => {
            Json(LinkedResource::new(shaped, state.links().author_links(id, fields))).into_response()
        }
        ResponseShape::Plain => Json(shaped).into_response(),
    };

    Ok(response)
}

/// `POST /api/authors`
///
/// Creates the author and any nested books; answers 201 with a `Location`
/// pointing at the new author.
pub async fn create_author<R: LibraryRepository>(
    State(state): State<LibraryState<R>>,
    headers: HeaderMap,
    Json(input): Json<AuthorForCreation>,
) -> Result<Response, ApiError> {
    validate_creation(&input)?;

    let author = state
        .repository()
        .add_author(Author::from_creation(input))
        .await
        .map_err(|e| ApiError::from(e).with_operation(ApiOperation::Create))?;
    let dto = AuthorDto::from_author(&author, state.today());
    let location = state.links().author_url(dto.id, None);

    tracing::info!(author_id = %dto.id, books = author.books.len(), "Author created");

    let response = match response_shape(&state, &headers) {
        ResponseShape::Hypermedia => {
            let links = state.links().author_links(dto.id, None);
            Created::new(LinkedResource::new(shape(&dto, None), links))
                .with_location(location)
                .into_response()
        }
        ResponseShape::Plain => Created::new(dto).with_location(location).into_response(),
    };

    Ok(response)
}

/// `POST /api/authors/{id}`
///
/// Creating onto an id is never allowed: 409 when the author exists, 404
/// otherwise.
pub async fn block_author_creation<R: LibraryRepository>(
    State(state): State<LibraryState<R>>,
    Path(id): Path<Uuid>,
) -> Result<Conflict, ApiError> {
    if state.repository().author_exists(id).await? {
        Ok(Conflict::new(format!("Author {id} already exists")))
    } else {
        Err(ApiError::not_found("Author", id.to_string()).with_operation(ApiOperation::Create))
    }
}

/// `DELETE /api/authors/{id}`, removing the author's books with it
pub async fn delete_author<R: LibraryRepository>(
    State(state): State<LibraryState<R>>,
    Path(id): Path<Uuid>,
) -> Result<NoContent, ApiError> {
    if !state.repository().delete_author(id).await? {
        return Err(ApiError::not_found("Author", id.to_string()).with_operation(ApiOperation::Delete));
    }

    tracing::info!(author_id = %id, "Author deleted");
    Ok(NoContent)
}
