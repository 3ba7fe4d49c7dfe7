use axum::http::{HeaderValue, Method, header};
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

/// Variable holding comma-separated allowed origins
pub const CORS_ALLOWED_ORIGIN: &str = "CORS_ALLOWED_ORIGIN";

/// Creates a CORS layer for the given origins.
///
/// - Methods: GET, POST, PUT, DELETE, OPTIONS
/// - Headers: Content-Type, Accept
/// - 1 hour max age
pub fn create_cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

/// Creates a permissive CORS layer for development.
///
/// Allows any origin - **DO NOT USE IN PRODUCTION**.
pub fn create_permissive_cors_layer() -> CorsLayer {
    CorsLayer::permissive()
}

/// Parse a comma-separated origin list, skipping blanks.
pub fn parse_origins(raw: &str) -> io::Result<Vec<HeaderValue>> {
    let origins = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(HeaderValue::from_str)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid {} value: {}", CORS_ALLOWED_ORIGIN, e),
            )
        })?;

    if origins.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} cannot be empty", CORS_ALLOWED_ORIGIN),
        ));
    }

    Ok(origins)
}

/// Build the CORS layer from `CORS_ALLOWED_ORIGIN`.
///
/// Falls back to a permissive layer when the variable is unset.
pub fn cors_layer_from_env() -> io::Result<CorsLayer> {
    match std::env::var(CORS_ALLOWED_ORIGIN) {
        Ok(raw) => {
            let origins = parse_origins(&raw)?;
            info!("CORS configured with allowed origins: {}", raw);
            Ok(create_cors_layer(origins))
        }
        Err(_) => {
            warn!("{} not set, allowing any origin", CORS_ALLOWED_ORIGIN);
            Ok(create_permissive_cors_layer())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins() {
        let origins = parse_origins("http://localhost:3000, https://example.com,").unwrap();
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[1], "https://example.com");
    }

    #[test]
    fn test_parse_origins_rejects_empty() {
        assert!(parse_origins(" , ").is_err());
    }

    #[test]
    fn test_env_layer() {
        temp_env::with_var(CORS_ALLOWED_ORIGIN, None::<&str>, || {
            assert!(cors_layer_from_env().is_ok());
        });
        temp_env::with_var(CORS_ALLOWED_ORIGIN, Some("http://localhost:3000"), || {
            assert!(cors_layer_from_env().is_ok());
        });
        temp_env::with_var(CORS_ALLOWED_ORIGIN, Some(","), || {
            assert!(cors_layer_from_env().is_err());
        });
    }
}
