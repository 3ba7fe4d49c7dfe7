pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Standard error response structure.
///
/// # JSON Example
///
/// ```json
/// {
///   "code": 1001,
///   "error": "VALIDATION_ERROR",
///   "message": "Username fidodog is already in use."
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
}

/// Application error type that can be converted to HTTP responses.
///
/// Domain crates convert their own error enums into this type; it is the
/// only place where failure kinds become status codes.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, code) = match self {
            AppError::JsonExtractorRejection(e) => {
                let code = match &e {
                    JsonRejection::MissingJsonContentType(_) => ErrorCode::UnsupportedMediaType,
                    JsonRejection::JsonSyntaxError(_) => ErrorCode::InvalidJson,
                    _ => ErrorCode::JsonExtraction,
                };
                tracing::warn!(error_code = code.code(), "JSON extraction error: {:?}", e);
                (e.status(), e.body_text(), code)
            }
            AppError::BadRequest(msg) => {
                tracing::info!(
                    error_code = ErrorCode::ValidationError.code(),
                    "Bad request: {}",
                    msg
                );
                (StatusCode::BAD_REQUEST, msg, ErrorCode::ValidationError)
            }
            AppError::NotFound(msg) => {
                tracing::info!(
                    error_code = ErrorCode::NotFound.code(),
                    "Not found: {}",
                    msg
                );
                (StatusCode::NOT_FOUND, msg, ErrorCode::NotFound)
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(
                    error_code = ErrorCode::InternalError.code(),
                    "Internal server error: {}",
                    msg
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    msg,
                    ErrorCode::InternalError,
                )
            }
        };

        error_response(status, message, code)
    }
}

/// Helper function to create error responses.
///
/// # Example
///
/// ```rust,ignore
/// use axum_helpers::errors::{error_response, ErrorCode};
/// use axum::http::StatusCode;
///
/// let response = error_response(
///     StatusCode::BAD_REQUEST,
///     "Invalid input".to_string(),
///     ErrorCode::ValidationError,
/// );
/// ```
pub fn error_response(status: StatusCode, message: String, error_code: ErrorCode) -> Response {
    let body = Json(ErrorResponse {
        code: error_code.code(),
        error: error_code.as_str().to_string(),
        message,
    });

    (status, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_bad_request_body() {
        let response = AppError::BadRequest("Invalid attribute: DOG".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["code"], 1001);
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert_eq!(body["message"], "Invalid attribute: DOG");
    }

    #[tokio::test]
    async fn test_internal_error_status() {
        let response = AppError::InternalServerError("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "INTERNAL_ERROR");
    }

    #[tokio::test]
    async fn test_not_found_status() {
        let response = AppError::NotFound("nope".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
