pub mod server;
pub mod tracing;

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable '{0}' is required but not set")]
    MissingEnvVar(String),

    #[error("Failed to parse environment variable '{key}': {details}")]
    ParseError { key: String, details: String },
}

/// Application environment, read from `APP_ENV`
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn from_env() -> Self {
        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        if app_env.eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

/// Name and version of the running binary
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AppInfo {
    pub name: &'static str,
    pub version: &'static str,
}

/// Build an [`AppInfo`] from the calling crate's Cargo metadata.
///
/// ```ignore
/// let router = health_router(core_config::app_info!(), None);
/// ```
#[macro_export]
macro_rules! app_info {
    () => {
        $crate::AppInfo {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        }
    };
}

/// Trait for configuration that can be loaded from environment variables
pub trait FromEnv: Sized {
    fn from_env() -> Result<Self, ConfigError>;
}

/// Helper to load and parse environment variable or return error
pub fn env_required(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Parse an environment variable into `T`, falling back to `default` when unset.
pub fn env_parse<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::ParseError {
            key: key.to_string(),
            details: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_defaults_to_development() {
        temp_env::with_var_unset("APP_ENV", || {
            let env = Environment::from_env();
            assert_eq!(env, Environment::Development);
            assert!(env.is_development());
            assert!(!env.is_production());
        });
    }

    #[test]
    fn test_environment_production() {
        temp_env::with_var("APP_ENV", Some("production"), || {
            let env = Environment::from_env();
            assert_eq!(env, Environment::Production);
            assert!(env.is_production());
            assert!(!env.is_development());
        });
    }

    #[test]
    fn test_environment_production_case_insensitive() {
        temp_env::with_var("APP_ENV", Some("PRODUCTION"), || {
            let env = Environment::from_env();
            assert_eq!(env, Environment::Production);
        });

        temp_env::with_var("APP_ENV", Some("Production"), || {
            let env = Environment::from_env();
            assert_eq!(env, Environment::Production);
        });
    }

    #[test]
    fn test_environment_unknown_defaults_to_development() {
        temp_env::with_var("APP_ENV", Some("staging"), || {
            let env = Environment::from_env();
            assert_eq!(env, Environment::Development);
        });
    }

    #[test]
    fn test_app_info_macro_uses_crate_metadata() {
        let info = app_info!();
        assert_eq!(info.name, "core_config");
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_env_required_success() {
        temp_env::with_var("REQUIRED_VAR", Some("required_value"), || {
            let result = env_required("REQUIRED_VAR");
            assert!(result.is_ok());
            assert_eq!(result.unwrap(), "required_value");
        });
    }

    #[test]
    fn test_env_parse_default_and_value() {
        temp_env::with_var_unset("POOL_SIZE", || {
            assert_eq!(env_parse("POOL_SIZE", 7u32).unwrap(), 7);
        });
        temp_env::with_var("POOL_SIZE", Some(" 12 "), || {
            assert_eq!(env_parse("POOL_SIZE", 7u32).unwrap(), 12);
        });
        temp_env::with_var("RUN_MIGRATIONS", Some("false"), || {
            assert!(!env_parse("RUN_MIGRATIONS", true).unwrap());
        });
    }

    #[test]
    fn test_env_parse_invalid() {
        temp_env::with_var("POOL_SIZE", Some("lots"), || {
            let err = env_parse("POOL_SIZE", 7u32).unwrap_err();
            assert!(err.to_string().contains("POOL_SIZE"));
        });
    }

    #[test]
    fn test_env_required_missing() {
        temp_env::with_var_unset("MISSING_REQUIRED", || {
            let result = env_required("MISSING_REQUIRED");
            assert!(result.is_err());
            let err = result.unwrap_err();
            assert!(err.to_string().contains("MISSING_REQUIRED"));
            assert!(err.to_string().contains("required"));
        });
    }
}
