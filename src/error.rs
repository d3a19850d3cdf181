//! Application error type and its HTTP mapping.
//!
//! Every fallible operation in the crate returns [`AppError`]. The JSON API
//! renders it through [`IntoResponse`]; the web layer turns the same values
//! into flash messages or HTML error pages (see [`crate::web::PageError`]).

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use validator::ValidationErrors;

/// Message returned to callers for any server-side failure.
pub const INTERNAL_MESSAGE: &str = "Internal server error";

/// Error taxonomy shared by the page and API flows.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("URL cannot be empty")]
    EmptyInput,

    #[error("Invalid URL format")]
    MalformedUrl,

    #[error("URL scheme not allowed")]
    DisallowedScheme,

    #[error(
        "Custom alias must be 3-50 characters and contain only letters, numbers, hyphens, and underscores"
    )]
    InvalidAlias,

    #[error("Custom alias already exists")]
    DuplicateAlias,

    #[error("Short code already exists")]
    DuplicateCode,

    #[error("Invalid expiration period")]
    InvalidExpiration,

    /// Boundary validation failure (payload shape, field lengths).
    #[error("{0}")]
    Validation(String),

    #[error("URL not found")]
    NotFound,

    #[error("This short URL has been deactivated")]
    Deactivated,

    #[error("This short URL has expired")]
    Expired,

    #[error("Database error: {0}")]
    Persistence(#[from] sqlx::Error),

    #[error("Failed to allocate a unique short code")]
    AllocationExhausted,
}

/// JSON error body: `{"error": "...", "code": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
}

impl AppError {
    /// HTTP status used when this error reaches a response.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::EmptyInput
            | AppError::MalformedUrl
            | AppError::DisallowedScheme
            | AppError::InvalidAlias
            | AppError::DuplicateAlias
            | AppError::InvalidExpiration
            | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::DuplicateCode => StatusCode::CONFLICT,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Deactivated | AppError::Expired => StatusCode::GONE,
            AppError::Persistence(_) | AppError::AllocationExhausted => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::EmptyInput => "empty_input",
            AppError::MalformedUrl => "malformed_url",
            AppError::DisallowedScheme => "disallowed_scheme",
            AppError::InvalidAlias => "invalid_alias",
            AppError::DuplicateAlias => "duplicate_alias",
            AppError::DuplicateCode => "duplicate_code",
            AppError::InvalidExpiration => "invalid_expiration",
            AppError::Validation(_) => "validation_error",
            AppError::NotFound => "not_found",
            AppError::Deactivated => "deactivated",
            AppError::Expired => "expired",
            AppError::Persistence(_) => "persistence_error",
            AppError::AllocationExhausted => "allocation_exhausted",
        }
    }

    /// Returns true for failures the caller did not cause.
    pub fn is_internal(&self) -> bool {
        self.status().is_server_error()
    }

    /// Message safe to show to end users. Internal details never leak.
    pub fn public_message(&self) -> String {
        if self.is_internal() {
            INTERNAL_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }

    /// Builds the JSON body for this error.
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            error: self.public_message(),
            code: self.code(),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_keys().map(|f| f.to_string()).collect();
        fields.sort();
        AppError::Validation(format!("Invalid field(s): {}", fields.join(", ")))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "Rejected JSON payload");
        AppError::Validation("Invalid JSON".to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_internal() {
            tracing::error!(error = %self, code = self.code(), "Request failed");
        }

        (self.status(), Json(self.to_body())).into_response()
    }
}
