//! JSON body extractor that leaves schema checks to the caller.

use crate::errors::AppError;
use axum::extract::{FromRequest, Json, Request};
use serde_json::Value;

/// Untyped JSON request body.
///
/// Rejects a missing or non-JSON `Content-Type` with 415 and a malformed body
/// with 400. The parsed value can be any JSON type; callers decide what
/// shape they accept.
///
/// # Example
/// ```ignore
/// use axum::Router;
/// use axum::routing::post;
/// use axum_helpers::extractors::JsonBody;
///
/// async fn create(JsonBody(body): JsonBody) -> String {
///     format!("keys: {}", body.as_object().map_or(0, |m| m.len()))
/// }
///
/// let app = Router::new().route("/customers", post(create));
/// ```
pub struct JsonBody(pub Value);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state).await?;
        Ok(JsonBody(value))
    }
}
