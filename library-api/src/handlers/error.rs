//! API error types for handler operations
//!
//! Every handler returns `Result<_, ApiError>`; the error turns into the
//! matching status code and a JSON body via `IntoResponse`. Server faults
//! are logged in full and answered with a generic message.
//!
//! # Example
//!
//! ```rust
//! use library_api::handlers::{ApiError, ApiErrorKind};
//!
//! let error = ApiError::not_found("Author", "4a1c");
//! assert!(matches!(error.kind, ApiErrorKind::NotFound));
//! assert_eq!(error.entity_id, Some("4a1c".to_string()));
//! ```

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::mapping::MappingError;
use crate::patch::PatchError;
use crate::repository::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
use crate::responses::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    List,
    Get,
    Create,
    Update,
    Patch,
    Delete,
}

impl fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => write!(f, "list"),
            Self::Get => write!(f, "get"),
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Patch => write!(f, "patch"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    NotFound,
    BadRequest,
    Conflict,
    ValidationFailed,
    InternalError,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::BadRequest => write!(f, "bad_request"),
            Self::Conflict => write!(f, "conflict"),
            Self::ValidationFailed => write!(f, "validation_failed"),
            Self::InternalError => write!(f, "internal_error"),
        }
    }
}

impl ApiErrorKind {
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Conflict => StatusCode::CONFLICT,
            Self::ValidationFailed => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[must_use]
    pub fn error_code(&self) -> String {
        self.to_string().to_uppercase()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub operation: ApiOperation,
    pub kind: ApiErrorKind,
    pub message: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    /// Per-field failures, answered as a 422 validation body
    pub field_errors: Option<ValidationError>,
}

impl ApiError {
    pub fn new(operation: ApiOperation, kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            entity_type: None,
            entity_id: None,
            field_errors: None,
        }
    }

    /// 404 for `entity_type` `entity_id`
    pub fn not_found(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        let entity_type = entity_type.into();
        Self::new(
            ApiOperation::Get,
            ApiErrorKind::NotFound,
            format!("{entity_type} not found"),
        )
        .with_entity(entity_type, entity_id)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ApiOperation::List, ApiErrorKind::BadRequest, message)
    }

    pub fn conflict(operation: ApiOperation, message: impl Into<String>) -> Self {
        Self::new(operation, ApiErrorKind::Conflict, message)
    }

    pub fn validation_failed(errors: ValidationError) -> Self {
        Self {
            field_errors: Some(errors),
            ..Self::new(
                ApiOperation::Create,
                ApiErrorKind::ValidationFailed,
                "Validation failed",
            )
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ApiOperation::Get, ApiErrorKind::InternalError, message)
    }

    #[must_use]
    pub fn with_entity(
        mut self,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id.into());
        self
    }

    #[must_use]
    pub fn with_operation(mut self, operation: ApiOperation) -> Self {
        self.operation = operation;
        self
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rejected ({}): {}", self.operation, self.kind, self.message)?;
        match (&self.entity_type, &self.entity_id) {
            (Some(entity_type), Some(entity_id)) => write!(f, " [{entity_type} {entity_id}]"),
            _ => Ok(()),
        }
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Serialize, Deserialize)]
struct ApiErrorResponse {
    error: String,
    code: String,
    status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    operation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    entity_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    entity_id: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.kind.status_code();

        if status.is_server_error() {
            tracing::error!(
                operation = %self.operation,
                kind = %self.kind,
                entity_type = ?self.entity_type,
                entity_id = ?self.entity_id,
                "API error: {}", self.message
            );
        } else {
            tracing::debug!(
                operation = %self.operation,
                kind = %self.kind,
                entity_type = ?self.entity_type,
                entity_id = ?self.entity_id,
                "Request rejected: {}", self.message
            );
        }

        if let Some(errors) = self.field_errors {
            return errors.into_response();
        }

        let response = ApiErrorResponse {
            error: self.message,
            code: self.kind.error_code(),
            status: status.as_u16(),
            operation: Some(self.operation.to_string()),
            entity_type: self.entity_type,
            entity_id: self.entity_id,
        };

        (status, Json(response)).into_response()
    }
}

fn repository_operation_to_api_operation(op: RepositoryOperation) -> ApiOperation {
    match op {
        RepositoryOperation::FindById | RepositoryOperation::Exists => ApiOperation::Get,
        RepositoryOperation::FindAll => ApiOperation::List,
        RepositoryOperation::Create => ApiOperation::Create,
        RepositoryOperation::Update => ApiOperation::Update,
        RepositoryOperation::Delete => ApiOperation::Delete,
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        let operation = repository_operation_to_api_operation(err.operation);

        let kind = match err.kind {
            RepositoryErrorKind::NotFound => ApiErrorKind::NotFound,
            RepositoryErrorKind::AlreadyExists => ApiErrorKind::Conflict,
            RepositoryErrorKind::InvalidSort | RepositoryErrorKind::StorageError => {
                ApiErrorKind::InternalError
            }
        };

        if kind == ApiErrorKind::InternalError {
            tracing::error!(error = %err, "Repository failure");
        }

        // Internal details stay in the logs
        let message = match kind {
            ApiErrorKind::InternalError => "An internal error occurred".to_string(),
            _ => err.message,
        };

        Self {
            operation,
            kind,
            message,
            entity_type: err.entity_type,
            entity_id: err.entity_id,
            field_errors: None,
        }
    }
}

impl From<MappingError> for ApiError {
    fn from(err: MappingError) -> Self {
        tracing::error!(error = %err, "Sort mapping lookup failed");
        Self::internal("An internal error occurred").with_operation(ApiOperation::List)
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        tracing::error!(code = err.code(), error = %err, "Internal error");
        Self::internal("An internal error occurred")
    }
}

impl From<ValidationError> for ApiError {
    fn from(errors: ValidationError) -> Self {
        Self::validation_failed(errors)
    }
}

impl From<PatchError> for ApiError {
    fn from(err: PatchError) -> Self {
        Self::validation_failed(err.into_validation_error()).with_operation(ApiOperation::Patch)
    }
}
