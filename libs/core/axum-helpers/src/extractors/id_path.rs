//! Integer path parameter extractor.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::{IntoResponse, Response},
};

/// Extractor for integer `{id}` path parameters.
///
/// A segment that is not an integer cannot name a resource, so it is
/// rejected as 404 rather than 400.
///
/// # Example
/// ```ignore
/// use axum::Router;
/// use axum::routing::get;
/// use axum_helpers::extractors::IdPath;
///
/// async fn get_customer(IdPath(id): IdPath) -> String {
///     format!("Customer ID: {}", id)
/// }
///
/// let app = Router::new().route("/customers/{id}", get(get_customer));
/// ```
pub struct IdPath(pub i32);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| e.into_response())?;

        match id.parse::<i32>() {
            Ok(id) => Ok(IdPath(id)),
            Err(_) => Err(AppError::NotFound(format!("No resource with id '{}'", id)).into_response()),
        }
    }
}
