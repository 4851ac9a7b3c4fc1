//! Error types and HTTP response conversion

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::mapping::MappingError;

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the library API
///
/// These are server-side failures. Client input problems never reach this
/// type; they are reported by the validators and turned into 4xx responses
/// by the handler layer.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// Configuration value rejected by validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Sort mapping table missing or malformed
    #[error("{0}")]
    Mapping(#[from] MappingError),

    /// Link base URL could not be parsed
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,

    /// Optional error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// HTTP status code
    pub status: u16,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: None,
            status: status.as_u16(),
        }
    }

    /// Create error response with a code
    pub fn with_code(
        status: StatusCode,
        code: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            error: error.into(),
            code: Some(code.into()),
            status: status.as_u16(),
        }
    }
}

impl Error {
    /// Stable error code used in response bodies
    pub fn code(&self) -> &'static str {
        match self {
            Error::Config(_) | Error::InvalidConfig(_) => "CONFIG_ERROR",
            Error::Mapping(_) => "MAPPING_ERROR",
            Error::InvalidBaseUrl(_) => "LINK_ERROR",
            Error::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::error!(code = self.code(), "Internal error: {}", self);

        // Every variant is a server fault; details stay in the logs.
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        let body = ErrorResponse::with_code(status, self.code(), "An internal error occurred");

        (status, Json(body)).into_response()
    }
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::InvalidBaseUrl(err.to_string())
    }
}
