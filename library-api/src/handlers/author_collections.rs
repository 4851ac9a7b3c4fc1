//! Bulk author creation and retrieval by id list

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use super::authors::validate_creation;
use super::error::{ApiError, ApiOperation};
use crate::models::{Author, AuthorDto, AuthorForCreation};
use crate::repository::LibraryRepository;
use crate::responses::{Created, ValidationError};
use crate::state::LibraryState;

/// Parse `(id1,id2,...)`; the parentheses are optional and blank entries are skipped
pub fn parse_id_list(raw: &str) -> Result<Vec<Uuid>, ApiError> {
    let raw = raw.trim();
    let inner = raw
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(raw);

    let ids = inner
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            Uuid::parse_str(token)
                .map_err(|_| ApiError::bad_request(format!("'{token}' is not a valid author id")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if ids.is_empty() {
        return Err(ApiError::bad_request("No author ids given"));
    }
    Ok(ids)
}

/// `POST /api/authorcollections`
///
/// Answers 201 with `Location: /api/authorcollections/(id1,id2,...)`.
pub async fn create_author_collection<R: LibraryRepository>(
    State(state): State<LibraryState<R>>,
    Json(inputs): Json<Vec<AuthorForCreation>>,
) -> Result<Created<Vec<AuthorDto>>, ApiError> {
    if inputs.is_empty() {
        return Err(ApiError::bad_request("No authors given").with_operation(ApiOperation::Create));
    }

    let mut errors = ValidationError::new("Author collection validation failed");
    for (index, input) in inputs.iter().enumerate() {
        if let Err(author_errors) = validate_creation(input) {
            for (field, failures) in author_errors.errors {
                errors
                    .errors
                    .entry(format!("[{index}].{field}"))
                    .or_default()
                    .extend(failures);
            }
        }
    }
    if errors.has_errors() {
        return Err(errors.into());
    }

    let today = state.today();
    let authors = state
        .repository()
        .add_authors(inputs.into_iter().map(Author::from_creation).collect())
        .await
        .map_err(|e| ApiError::from(e).with_operation(ApiOperation::Create))?;
    let created: Vec<AuthorDto> = authors
        .iter()
        .map(|author| AuthorDto::from_author(author, today))
        .collect();

    let ids: Vec<Uuid> = created.iter().map(|dto| dto.id).collect();
    tracing::info!(count = ids.len(), "Author collection created");

    let location = state.links().author_collection_url(&ids);
    Ok(Created::new(created).with_location(location))
}

/// `GET /api/authorcollections/({ids})`
///
/// 404 unless every id names an author; results follow the requested order.
pub async fn get_author_collection<R: LibraryRepository>(
    State(state): State<LibraryState<R>>,
    Path(raw_ids): Path<String>,
) -> Result<Json<Vec<AuthorDto>>, ApiError> {
    let ids = parse_id_list(&raw_ids)?;
    let authors = state.repository().find_authors(&ids).await?;

    if authors.len() != ids.len() {
        tracing::debug!(requested = ids.len(), found = authors.len(), "Author collection incomplete");
        return Err(ApiError::not_found("AuthorCollection", raw_ids));
    }

    let today = state.today();
    Ok(Json(
        authors
            .iter()
            .map(|author| AuthorDto::from_author(author, today))
            .collect(),
    ))
}
