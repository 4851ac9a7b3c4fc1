//! Book handlers, nested under an author
//!
//! Every operation first checks that the author exists (404 otherwise).
//! `PUT` and `PATCH` upsert: a missing book is created with the id from the
//! path and answered with 201, an existing one is updated and answered with
//! 204.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use super::authors::response_shape;
use super::error::{ApiError, ApiOperation};
use super::response::{LinkedCollection, LinkedResource, ResponseShape};
use crate::models::{Book, BookDto, BookForCreation, BookForManipulation, BookForUpdate};
use crate::patch::PatchDocument;
use crate::repository::LibraryRepository;
use crate::responses::{Created, NoContent};
use crate::state::LibraryState;

async fn ensure_author<R: LibraryRepository>(
    state: &LibraryState<R>,
    author_id: Uuid,
    operation: ApiOperation,
) -> Result<(), ApiError> {
    if state.repository().author_exists(author_id).await? {
        Ok(())
    } else {
        Err(ApiError::not_found("Author", author_id.to_string()).with_operation(operation))
    }
}

fn book_body<R>(state: &LibraryState<R>, shape: ResponseShape, book: &Book) -> Response {
    let dto = BookDto::from(book);
    match shape {
        ResponseShape::Hypermedia => {
            let links = state.links().book_links(book.author_id, book.id);
            Json(LinkedResource::new(dto, links)).into_response()
        }
        ResponseShape::Plain => Json(dto).into_response(),
    }
}

fn created_book<R>(state: &LibraryState<R>, shape: ResponseShape, book: &Book) -> Response {
    let location = state.links().book_url(book.author_id, book.id);
    let dto = BookDto::from(book);
    match shape {
        ResponseShape::Hypermedia => {
            let links = state.links().book_links(book.author_id, book.id);
            Created::new(LinkedResource::new(dto, links))
                .with_location(location)
                .into_response()
        }
        ResponseShape::Plain => Created::new(dto).with_location(location).into_response(),
    }
}

/// Insert `input` as book `book_id`, or write it over the existing book
async fn upsert_book<R: LibraryRepository>(
    state: &LibraryState<R>,
    shape: ResponseShape,
    author_id: Uuid,
    book_id: Uuid,
    existing: Option<Book>,
    input: BookForUpdate,
    operation: ApiOperation,
) -> Result<Response, ApiError> {
    match existing {
        None => {
            let book = state
                .repository()
                .add_book_for_author(author_id, Book::from_update(input, book_id, author_id))
                .await
                .map_err(|e| ApiError::from(e).with_operation(operation))?;
            tracing::info!(%author_id, %book_id, "Book upserted");
            Ok(created_book(state, shape, &book))
        }
        Some(mut book) => {
            input.apply_to(&mut book);
            state
                .repository()
                .update_book(book)
                .await
                .map_err(|e| ApiError::from(e).with_operation(operation))?;
            tracing::info!(%author_id, %book_id, "Book updated");
            Ok(NoContent.into_response())
        }
    }
}

/// `GET /api/authors/{author_id}/books`
pub async fn list_books_for_author<R: LibraryRepository>(
    State(state): State<LibraryState<R>>,
    Path(author_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    ensure_author(&state, author_id, ApiOperation::List).await?;
    let books = state.repository().books_for_author(author_id).await?;

    let response = match response_shape(&state, &headers) {
        ResponseShape::Hypermedia => {
            let links = state.links();
            let value = books
                .iter()
                .map(|book| LinkedResource::new(BookDto::from(book), links.book_links(author_id, book.id)))
                .collect();
            Json(LinkedCollection::new(value, links.books_links(author_id))).into_response()
        }
        ResponseShape::Plain => {
            Json(books.iter().map(BookDto::from).collect::<Vec<_>>()).into_response()
        }
    };

    Ok(response)
}

/// `GET /api/authors/{author_id}/books/{book_id}`
pub async fn get_book_for_author<R: LibraryRepository>(
    State(state): State<LibraryState<R>>,
    Path((author_id, book_id)): Path<(Uuid, Uuid)>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    ensure_author(&state, author_id, ApiOperation::Get).await?;
    let book = state
        .repository()
        .find_book_for_author(author_id, book_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Book", book_id.to_string()))?;

    Ok(book_body(&state, response_shape(&state, &headers), &book))
}

/// `POST /api/authors/{author_id}/books`
///
/// The body is validated before the author is looked up, so an invalid
/// book for an unknown author is still a 422.
pub async fn create_book_for_author<R: LibraryRepository>(
    State(state): State<LibraryState<R>>,
    Path(author_id): Path<Uuid>,
    headers: HeaderMap,
    Json(input): Json<BookForCreation>,
) -> Result<Response, ApiError> {
    input.validate()?;
    ensure_author(&state, author_id, ApiOperation::Create).await?;

    let book = state
        .repository()
        .add_book_for_author(author_id, Book::from_creation(input, author_id))
        .await
        .map_err(|e| ApiError::from(e).with_operation(ApiOperation::Create))?;
    tracing::info!(%author_id, book_id = %book.id, "Book created");

    Ok(created_book(&state, response_shape(&state, &headers), &book))
}

/// `PUT /api/authors/{author_id}/books/{book_id}`
pub async fn update_book_for_author<R: LibraryRepository>(
    State(state): State<LibraryState<R>>,
    Path((author_id, book_id)): Path<(Uuid, Uuid)>,
    headers: HeaderMap,
    Json(input): Json<BookForUpdate>,
) -> Result<Response, ApiError> {
    input
        .validate()
        .map_err(|e| ApiError::from(e).with_operation(ApiOperation::Update))?;
    ensure_author(&state, author_id, ApiOperation::Update).await?;

    let existing = state
        .repository()
        .find_book_for_author(author_id, book_id)
        .await?;
    let shape = response_shape(&state, &headers);
    upsert_book(&state, shape, author_id, book_id, existing, input, ApiOperation::Update).await
}

/// `PATCH /api/authors/{author_id}/books/{book_id}`
///
/// The patch applies to the current book, or to a blank one when the book
/// does not exist yet; the patched result must pass book validation.
pub async fn partially_update_book_for_author<R: LibraryRepository>(
    State(state): State<LibraryState<R>>,
    Path((author_id, book_id)): Path<(Uuid, Uuid)>,
    headers: HeaderMap,
    Json(patch): Json<PatchDocument>,
) -> Result<Response, ApiError> {
    ensure_author(&state, author_id, ApiOperation::Patch).await?;

    let existing = state
        .repository()
        .find_book_for_author(author_id, book_id)
        .await?;
    let mut update = existing
        .as_ref()
        .map(BookForUpdate::from_book)
        .unwrap_or_default();

    patch.apply_to(&mut update)?;
    update
        .validate()
        .map_err(|e| ApiError::from(e).with_operation(ApiOperation::Patch))?;

    let shape = response_shape(&state, &headers);
    upsert_book(&state, shape, author_id, book_id, existing, update, ApiOperation::Patch).await
}

/// `DELETE /api/authors/{author_id}/books/{book_id}`
pub async fn delete_book_for_author<R: LibraryRepository>(
    State(state): State<LibraryState<R>>,
    Path((author_id, book_id)): Path<(Uuid, Uuid)>,
) -> Result<NoContent, ApiError> {
    ensure_author(&state, author_id, ApiOperation::Delete).await?;

    if !state.repository().delete_book(author_id, book_id).await? {
        return Err(ApiError::not_found("Book", book_id.to_string()).with_operation(ApiOperation::Delete));
    }

    tracing::info!("The book {book_id} for the author {author_id} was deleted.");
    Ok(NoContent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::{
        self, body_json, hypermedia_headers, id, GAME_OF_THRONES_ID, IT_ID, KING_ID, MARTIN_ID,
    };
    use crate::handlers::ApiErrorKind;
    use crate::patch::PatchOperation;
    use axum::http::{header, StatusCode};
    use serde_json::json;

    fn new_book(title: &str, description: Option<&str>) -> BookForCreation {
        BookForCreation {
            title: title.to_string(),
            description: description.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_list_books() {
        let response = list_books_for_author(
            State(testing::state()),
            Path(id(KING_ID)),
            HeaderMap::new(),
        )
        .await
        .unwrap();
        let body = body_json(response).await;
        assert_eq!(body[0]["id"], IT_ID);
        assert_eq!(body[0]["authorId"], KING_ID);
    }

    #[tokio::test]
    async fn test_list_books_hypermedia() {
        let response = list_books_for_author(
            State(testing::state()),
            Path(id(KING_ID)),
            hypermedia_headers(),
        )
        .await
        .unwrap();
        let body = body_json(response).await;
        let rels: Vec<&str> = body["value"][0]["links"]
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["rel"].as_str().unwrap())
            .collect();
        assert_eq!(
            rels,
            vec!["self", "delete_book", "update_book", "partially_update_book"]
        );
        assert!(body["links"][0]["href"]
            .as_str()
            .unwrap()
            .ends_with(&format!("/api/authors/{KING_ID}/books")));
    }

    #[tokio::test]
    async fn test_list_books_unknown_author() {
        let err = list_books_for_author(State(testing::state()), Path(Uuid::nil()), HeaderMap::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_get_book_belongs_to_author() {
        let state = testing::state();
        let response = get_book_for_author(
            State(state.clone()),
            Path((id(MARTIN_ID), id(GAME_OF_THRONES_ID))),
            HeaderMap::new(),
        )
        .await
        .unwrap();
        assert_eq!(body_json(response).await["title"], "A Game of Thrones");

        let err = get_book_for_author(
            State(state),
            Path((id(KING_ID), id(GAME_OF_THRONES_ID))),
            HeaderMap::new(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_book() {
        let state = testing::state();
        let response = create_book_for_author(
            State(state.clone()),
            Path(id(KING_ID)),
            HeaderMap::new(),
            Json(new_book("The Shining", Some("Overlook Hotel"))),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let location = response.headers()[header::LOCATION].to_str().unwrap().to_string();
        let body = body_json(response).await;
        assert!(location.ends_with(body["id"].as_str().unwrap()));

        let books = state.repository().books_for_author(id(KING_ID)).await.unwrap();
        assert_eq!(books.len(), 2);
    }

    #[tokio::test]
    async fn test_create_book_validation_comes_first() {
        let err = create_book_for_author(
            State(testing::state()),
            Path(Uuid::nil()),
            HeaderMap::new(),
            Json(new_book("Same", Some("Same"))),
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::ValidationFailed);

        let err = create_book_for_author(
            State(testing::state()),
            Path(Uuid::nil()),
            HeaderMap::new(),
            Json(new_book("Carrie", None)),
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_put_updates_existing_book() {
        let state = testing::state();
        let input = BookForUpdate {
            title: "It (revised)".to_string(),
            description: None,
        };
        let response = update_book_for_author(
            State(state.clone()),
            Path((id(KING_ID), id(IT_ID))),
            HeaderMap::new(),
            Json(input),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let book = state
            .repository()
            .find_book_for_author(id(KING_ID), id(IT_ID))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(book.title, "It (revised)");
        assert_eq!(book.description, None);
    }

    #[tokio::test]
    async fn test_put_creates_missing_book() {
        let state = testing::state();
        let book_id = Uuid::new_v4();
        let input = BookForUpdate {
            title: "Misery".to_string(),
            description: Some("Annie Wilkes".to_string()),
        };
        let response = update_book_for_author(
            State(state.clone()),
            Path((id(KING_ID), book_id)),
            HeaderMap::new(),
            Json(input),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await["id"], book_id.to_string());
    }

    #[tokio::test]
    async fn test_put_rejects_invalid_book() {
        let err = update_book_for_author(
            State(testing::state()),
            Path((id(KING_ID), id(IT_ID))),
            HeaderMap::new(),
            Json(BookForUpdate::default()),
        )
        .await
        .unwrap_err();
        assert_eq!(err.operation, ApiOperation::Update);
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_patch_existing_book() {
        let state = testing::state();
        let patch = PatchDocument::new(vec![PatchOperation::Replace {
            path: "/description".to_string(),
            value: json!("Pennywise"),
        }]);
        let response = partially_update_book_for_author(
            State(state.clone()),
            Path((id(KING_ID), id(IT_ID))),
            HeaderMap::new(),
            Json(patch),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let book = state
            .repository()
            .find_book_for_author(id(KING_ID), id(IT_ID))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(book.title, "It");
        assert_eq!(book.description.as_deref(), Some("Pennywise"));
    }

    #[tokio::test]
    async fn test_patch_creates_missing_book() {
        let book_id = Uuid::new_v4();
        let patch: PatchDocument = serde_json::from_value(json!([
            { "op": "add", "path": "/title", "value": "Carrie" }
        ]))
        .unwrap();
        let response = partially_update_book_for_author(
            State(testing::state()),
            Path((id(KING_ID), book_id)),
            hypermedia_headers(),
            Json(patch),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["title"], "Carrie");
        assert_eq!(body["links"][3]["method"], "PATCH");
    }

    #[tokio::test]
    async fn test_patch_result_must_validate() {
        let patch = PatchDocument::new(vec![PatchOperation::Remove {
            path: "/title".to_string(),
        }]);
        let err = partially_update_book_for_author(
            State(testing::state()),
            Path((id(KING_ID), id(IT_ID))),
            HeaderMap::new(),
            Json(patch),
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::ValidationFailed);
        assert_eq!(err.operation, ApiOperation::Patch);
    }

    #[tokio::test]
    async fn test_patch_unknown_field() {
        let patch = PatchDocument::new(vec![PatchOperation::Replace {
            path: "/isbn".to_string(),
            value: json!("978-0"),
        }]);
        let err = partially_update_book_for_author(
            State(testing::state()),
            Path((id(KING_ID), id(IT_ID))),
            HeaderMap::new(),
            Json(patch),
        )
        .await
        .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_delete_book() {
        let state = testing::state();
        let response = delete_book_for_author(State(state.clone()), Path((id(KING_ID), id(IT_ID))))
            .await
            .unwrap()
            .into_response();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let err = delete_book_for_author(State(state), Path((id(KING_ID), id(IT_ID))))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::NotFound);
    }
}
