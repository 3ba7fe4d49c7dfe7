use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CustomerError {
    #[error("Invalid Customer: missing {0}")]
    MissingField(String),

    #[error("Invalid attribute: {0}")]
    InvalidAttribute(String),

    #[error("Invalid Customer: {0}")]
    InvalidType(String),

    #[error("Username {0} is already in use.")]
    DuplicateUsername(String),

    #[error("Email {0} is already in use.")]
    DuplicateEmail(String),

    #[error("There is no valid ID Specified")]
    NoValidId,

    #[error("Data validation error: {0}")]
    DataValidation(String),

    #[error("Customer with id '{0}' was not found.")]
    NotFound(i32),

    #[error("Invalid gender value: {0}")]
    InvalidGenderValue(String),

    #[error("Invalid active value: {0}")]
    InvalidActiveValue(String),
}

pub type CustomerResult<T> = Result<T, CustomerError>;

impl CustomerError {
    /// Wraps a storage-layer failure.
    pub fn storage(err: impl std::fmt::Display) -> Self {
        CustomerError::DataValidation(err.to_string())
    }
}

/// Convert CustomerError to AppError for standardized error responses
impl From<CustomerError> for AppError {
    fn from(err: CustomerError) -> Self {
        let message = err.to_string();
        match err {
            CustomerError::MissingField(_)
            | CustomerError::InvalidAttribute(_)
            | CustomerError::InvalidType(_)
            | CustomerError::DuplicateUsername(_)
            | CustomerError::DuplicateEmail(_)
            | CustomerError::InvalidGenderValue(_)
            | CustomerError::InvalidActiveValue(_) => AppError::BadRequest(message),
            CustomerError::NotFound(_) => AppError::NotFound(message),
            CustomerError::NoValidId | CustomerError::DataValidation(_) => {
                AppError::InternalServerError(message)
            }
        }
    }
}

impl IntoResponse for CustomerError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_messages_match_service_wording() {
        assert_eq!(
            CustomerError::DuplicateUsername("fidodog".into()).to_string(),
            "Username fidodog is already in use."
        );
        assert_eq!(
            CustomerError::MissingField("email".into()).to_string(),
            "Invalid Customer: missing email"
        );
        assert_eq!(
            CustomerError::NoValidId.to_string(),
            "There is no valid ID Specified"
        );
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (CustomerError::InvalidType("x".into()), StatusCode::BAD_REQUEST),
            (CustomerError::DuplicateEmail("a@b.c".into()), StatusCode::BAD_REQUEST),
            (CustomerError::InvalidActiveValue("yes".into()), StatusCode::BAD_REQUEST),
            (CustomerError::NotFound(7), StatusCode::NOT_FOUND),
            (CustomerError::NoValidId, StatusCode::INTERNAL_SERVER_ERROR),
            (
                CustomerError::storage("connection reset"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
