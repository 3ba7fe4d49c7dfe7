//! Error codes carried in every error body.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::ValidationError;
//! assert_eq!(code.as_str(), "VALIDATION_ERROR");
//! assert_eq!(code.code(), 1001);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Body or query parameters were rejected by the domain
    ValidationError,
    /// Body is JSON but could not be extracted
    JsonExtraction,
    /// Body is not well-formed JSON
    InvalidJson,
    /// Body was sent without a JSON content type
    UnsupportedMediaType,
    NotFound,
    MethodNotAllowed,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::InvalidJson => "INVALID_JSON",
            Self::UnsupportedMediaType => "UNSUPPORTED_MEDIA_TYPE",
            Self::NotFound => "NOT_FOUND",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Numeric code for structured logs: 1xxx client, 2xxx server.
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::JsonExtraction => 1002,
            Self::InvalidJson => 1003,
            Self::UnsupportedMediaType => 1004,
            Self::NotFound => 1005,
            Self::MethodNotAllowed => 1006,
            Self::InternalError => 2001,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::JsonExtraction => "Failed to parse request body",
            Self::InvalidJson => "Invalid JSON format",
            Self::UnsupportedMediaType => "Content-Type must be application/json",
            Self::NotFound => "Resource not found",
            Self::MethodNotAllowed => "The HTTP method is not allowed for this resource",
            Self::InternalError => "An internal server error occurred",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
