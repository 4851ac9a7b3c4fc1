//! Shared fixtures for handler tests

use axum::{
    http::{header, HeaderMap, HeaderValue},
    response::Response,
};
use chrono::NaiveDate;
use uuid::Uuid;

use crate::config::Config;
use crate::models::{Author, Book};
use crate::repository::InMemoryLibraryRepository;
use crate::state::LibraryState;

pub const KING_ID: &str = "25320c5e-f58a-4b1f-b63a-8ee07a840bdf";
pub const MARTIN_ID: &str = "76053df4-6687-4353-8937-b45556748abe";
pub const GAIMAN_ID: &str = "412c3012-d891-4f5e-9613-ff7aa63e6bb3";
pub const IT_ID: &str = "c7ba6add-09c4-45f8-8dd0-eaca221e5d93";
pub const GAME_OF_THRONES_ID: &str = "447eb762-95e9-4c31-95e1-b20053fbe215";

pub type TestState = LibraryState<InMemoryLibraryRepository>;

pub fn id(value: &str) -> Uuid {
    Uuid::parse_str(value).unwrap()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
}

fn author(id_value: &str, first: &str, last: &str, born: (i32, u32, u32), genre: &str) -> Author {
    Author {
        id: id(id_value),
        first_name: first.to_string(),
        last_name: last.to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(born.0, born.1, born.2).unwrap(),
        genre: genre.to_string(),
        books: Vec::new(),
    }
}

fn book(id_value: &str, title: &str, author_id: &str) -> Book {
    Book {
        id: id(id_value),
        title: title.to_string(),
        description: Some(format!("{title}, the book")),
        author_id: id(author_id),
    }
}

/// Three authors, two with a book each, ages computed on 2020-01-01
pub fn state() -> TestState {
    let mut king = author(KING_ID, "Stephen", "King", (1947, 9, 21), "Horror");
    king.books.push(book(IT_ID, "It", KING_ID));
    let mut martin = author(MARTIN_ID, "George", "RR Martin", (1948, 9, 20), "Fantasy");
    martin
        .books
        .push(book(GAME_OF_THRONES_ID, "A Game of Thrones", MARTIN_ID));
    let gaiman = author(GAIMAN_ID, "Neil", "Gaiman", (1960, 11, 10), "Fantasy");

    let repository = InMemoryLibraryRepository::with_authors(vec![king, martin, gaiman]);
    LibraryState::new(Config::default(), repository)
        .unwrap()
        .with_today(today)
}

pub fn hypermedia_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static("application/vnd.library.hateoas+json"),
    );
    headers
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
