use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::common::RetryConfig;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(
        max_connections = config.database.max_connections,
        "Connecting to PostgreSQL"
    );
    let db = database::postgres::connect_from_config_with_retry(
        config.database.clone(),
        Some(RetryConfig::startup()),
    )
    .await
    .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    if config.run_migrations {
        database::postgres::run_migrations::<migration::Migrator>(&db, config.app.name).await?;
    } else {
        info!("RUN_MIGRATIONS=false, skipping migrations");
    }

    let state = AppState { config, db };

    let api_routes = api::routes(&state);

    // create_router adds docs/middleware to our composed routes
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes)?;

    // - /, /health: service info and liveness
    // - /ready: readiness with a database ping
    // - /static: admin page
    let app = router
        .merge(health_router(state.config.app, Some(api::ADMIN_PAGE)))
        .merge(api::ready_router(state.clone()))
        .merge(api::static_router(&state.config.static_dir));

    info!("Starting {} with graceful shutdown (30s timeout)", state.config.app.name);

    create_production_app(
        app,
        &state.config.server,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: closing database connections");
            match state.db.close().await {
                Ok(_) => info!("PostgreSQL connection closed successfully"),
                Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
            }
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Customers API shutdown complete");
    Ok(())
}
