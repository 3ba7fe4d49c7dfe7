//! Reusable OpenAPI response types for consistent API documentation.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "code": 2001,
        "error": "INTERNAL_ERROR",
        "message": "An internal server error occurred"
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request",
    content_type = "application/json",
    example = json!({
        "code": 1001,
        "error": "VALIDATION_ERROR",
        "message": "Invalid Customer: missing email"
    })
)]
pub struct BadRequestResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/json",
    example = json!({
        "code": 1005,
        "error": "NOT_FOUND",
        "message": "Resource not found"
    })
)]
pub struct NotFoundResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Unsupported Media Type",
    content_type = "application/json",
    example = json!({
        "code": 1004,
        "error": "UNSUPPORTED_MEDIA_TYPE",
        "message": "Expected request with `Content-Type: application/json`"
    })
)]
pub struct UnsupportedMediaTypeResponse(pub ErrorResponse);
