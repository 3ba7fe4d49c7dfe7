use crate::Environment;
use tracing_subscriber::{prelude::*, EnvFilter};

/// Install the `color-eyre` report hook used for startup failures.
///
/// Later calls are no-ops.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Filter applied when `RUST_LOG` is unset.
///
/// Production keeps request traces and silences per-statement SQL logging;
/// development logs the service and its queries at debug.
pub fn default_filter(environment: &Environment) -> &'static str {
    match environment {
        Environment::Production => "info,tower_http=info,sea_orm=warn,sqlx=warn",
        Environment::Development => "debug,hyper=info,h2=info,sqlx=info",
    }
}

fn env_filter(environment: &Environment) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(environment)))
}

/// Install the global subscriber: flattened JSON lines in production, pretty
/// output in development. Both carry `tracing_error::ErrorLayer` so eyre
/// reports include span traces.
///
/// Returns `false` when a subscriber was already installed (tests).
pub fn init_tracing(environment: &Environment) -> bool {
    let registry = tracing_subscriber::registry()
        .with(env_filter(environment))
        .with(tracing_error::ErrorLayer::default());

    let installed = match environment {
        Environment::Production => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_target(false),
            )
            .try_init(),
        Environment::Development => registry
            .with(tracing_subscriber::fmt::layer().pretty().with_target(false))
            .try_init(),
    }
    .is_ok();

    if installed {
        tracing::info!(?environment, "Tracing initialized");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_quiets_sql() {
        let filter = default_filter(&Environment::Production);
        assert!(filter.starts_with("info"));
        assert!(filter.contains("sea_orm=warn"));
    }

    #[test]
    fn test_development_logs_debug() {
        assert!(default_filter(&Environment::Development).starts_with("debug"));
    }

    #[test]
    fn test_rust_log_overrides_default() {
        temp_env::with_var("RUST_LOG", Some("warn"), || {
            let filter = env_filter(&Environment::Development).to_string();
            assert!(filter.contains("warn"), "{filter}");
            assert!(!filter.contains("debug"), "{filter}");
        });
    }

    #[test]
    fn test_second_init_is_ignored() {
        init_tracing(&Environment::Development);
        assert!(!init_tracing(&Environment::Production));
    }
}
