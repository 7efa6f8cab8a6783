//! Error Types
//!
//! Layered error types with HTTP status code mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Domain-level errors raised while fitting or applying a treatment design
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid settings: {0:?}")]
    InvalidSettings(Vec<String>),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Feature '{0}' is missing from the dataset")]
    MissingFeature(String),

    #[error("Invalid design state: {0}")]
    InvalidState(String),
}

/// Repository-level errors for data access failures
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Unique constraint violated: {0}")]
    Conflict(String),

    #[error("Data mapping error: {0}")]
    Mapping(String),
}

/// Errors raised while decoding or encoding a dataset
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Malformed dataset: {0}")]
    Malformed(String),

    #[error("Dataset has no columns")]
    Empty,

    #[error("Dataset has {rows} rows, at most {max} are accepted")]
    TooManyRows { rows: usize, max: usize },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Errors raised while fetching a remote dataset
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid dataset URL: {0}")]
    InvalidUrl(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Remote returned status {0}")]
    Status(u16),

    #[error("Remote dataset exceeds {0} bytes")]
    TooLarge(usize),
}

/// Use case-level errors for application logic failures
#[derive(Debug, Error)]
pub enum UseCaseError {
    #[error("Validation failed: {0:?}")]
    Validation(Vec<String>),

    #[error("{resource} with id '{id}' not found")]
    NotFound { resource: String, id: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl UseCaseError {
    /// Get the HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Domain(DomainError::InvalidSettings(_)) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict(_) | Self::Repository(RepositoryError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Domain(DomainError::InvalidInput(_) | DomainError::MissingFeature(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::Domain(DomainError::InvalidState(_)) => StatusCode::BAD_REQUEST,
            Self::Dataset(DatasetError::TooManyRows { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Dataset(_) => StatusCode::BAD_REQUEST,
            Self::Fetch(FetchError::InvalidUrl(_)) => StatusCode::BAD_REQUEST,
            Self::Fetch(FetchError::TooLarge(_)) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Fetch(_) => StatusCode::BAD_GATEWAY,
            Self::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) | Self::Domain(DomainError::InvalidSettings(_)) => "VALIDATION_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Conflict(_) | Self::Repository(RepositoryError::Conflict(_)) => "CONFLICT",
            Self::Domain(DomainError::InvalidInput(_)) => "INVALID_INPUT",
            Self::Domain(DomainError::MissingFeature(_)) => "MISSING_FEATURE",
            Self::Domain(DomainError::InvalidState(_)) => "INVALID_STATE",
            Self::Dataset(DatasetError::TooManyRows { .. }) | Self::Fetch(FetchError::TooLarge(_)) => {
                "PAYLOAD_TOO_LARGE"
            }
            Self::Dataset(_) => "INVALID_DATASET",
            Self::Fetch(FetchError::InvalidUrl(_)) => "INVALID_URL",
            Self::Fetch(_) => "FETCH_ERROR",
            Self::Repository(_) => "INTERNAL_ERROR",
        }
    }

    fn details(&self) -> Option<Vec<FieldError>> {
        let messages = match self {
            Self::Validation(messages) | Self::Domain(DomainError::InvalidSettings(messages)) => messages,
            _ => return None,
        };
        Some(messages.iter().map(|m| FieldError::from_message(m)).collect())
    }
}

/// API error response for HTTP responses
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    UseCase(#[from] UseCaseError),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid UUID: {0}")]
    InvalidUuid(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

/// Error response body structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

/// Error detail structure
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// Field-level error for validation errors
#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    /// Split a `field: message` string; messages without a field keep an empty one
    fn from_message(raw: &str) -> Self {
        match raw.split_once(": ") {
            Some((field, message)) if !field.contains(' ') => Self {
                field: field.to_string(),
                message: message.to_string(),
            },
            _ => Self {
                field: String::new(),
                message: raw.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            ApiError::UseCase(uc_error) => {
                match uc_error {
                    UseCaseError::Repository(RepositoryError::Conflict(e)) => {
                        tracing::warn!(error = %e, "Concurrent write rejected");
                    }
                    UseCaseError::Repository(e) => tracing::error!(error = %e, "Repository failure"),
                    _ => {}
                }
                (
                    uc_error.status_code(),
                    uc_error.error_code().to_string(),
                    uc_error.to_string(),
                    uc_error.details(),
                )
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST".to_string(), msg.clone(), None),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED".to_string(),
                "Unauthorized".to_string(),
                None,
            ),
            ApiError::InvalidUuid(msg) => (StatusCode::BAD_REQUEST, "INVALID_UUID".to_string(), msg.clone(), None),
            ApiError::Internal(e) => {
                tracing::error!(error = %e, "Unhandled internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR".to_string(),
                    "An unexpected error occurred".to_string(),
                    None,
                )
            }
        };

        let body = ErrorResponse {
            error: ErrorDetail { code, message, details },
            request_id: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<uuid::Error> for ApiError {
    fn from(err: uuid::Error) -> Self {
        ApiError::InvalidUuid(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = err
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    format!("{}: {}", field, e.message.as_ref().map_or("invalid", |m| m.as_ref()))
                })
            })
            .collect();
        ApiError::UseCase(UseCaseError::Validation(messages))
    }
}
