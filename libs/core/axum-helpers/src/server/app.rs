use super::shutdown::ShutdownCoordinator;
use crate::errors::handlers::not_found;
use crate::http::{cors_layer_from_env, security_headers};
use axum::{Router, middleware};
use core_config::server::ServerConfig;
use std::io;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Path of the generated OpenAPI document
pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";

/// Creates a configured Axum router with common middleware and documentation.
///
/// This function sets up:
/// - Swagger UI at `/swagger-ui`, backed by [`OPENAPI_JSON`]
/// - API routes merged at the root
/// - Common middleware (tracing, security headers, CORS, compression)
/// - JSON 404 fallback handler
///
/// CORS origins come from `CORS_ALLOWED_ORIGIN` (comma separated). When the
/// variable is unset every origin is allowed.
///
/// # Errors
/// Returns an error if `CORS_ALLOWED_ORIGIN` is set but empty or invalid.
///
/// # Example
/// ```ignore
/// use axum::Router;
/// use utoipa::OpenApi;
/// use axum_helpers::server::create_router;
///
/// #[derive(OpenApi)]
/// #[openapi(paths(/* your paths */))]
/// struct ApiDoc;
///
/// let api_routes = Router::new()
///     .nest("/customers", customers_router)
///     .with_state(());
///
/// let router = create_router::<ApiDoc>(api_routes)?;
/// ```
pub fn create_router<T>(apis: Router) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    let cors_layer = cors_layer_from_env()?;

    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url(OPENAPI_JSON, T::openapi()))
        .merge(apis)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers))
        .layer(cors_layer)
        .layer(CompressionLayer::new());

    Ok(router)
}

/// Production-ready server with coordinated shutdown and cleanup.
///
/// # Arguments
/// * `router` - The configured Axum router
/// * `server_config` - Server configuration
/// * `shutdown_timeout` - Maximum time to wait for cleanup (recommended: 30s)
/// * `cleanup` - Async cleanup function for database connections, etc.
///
/// # Example
/// ```ignore
/// use std::time::Duration;
/// use axum_helpers::server::create_production_app;
///
/// let cleanup = async move {
///     db.close().await.ok();
/// };
///
/// create_production_app(router, &config, Duration::from_secs(30), cleanup).await?;
/// ```
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let coordinator = ShutdownCoordinator::new();
    let shutdown_handle = coordinator.clone();

    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let mut shutdown_rx = coordinator.subscribe();
    let cleanup_handle = tokio::spawn(async move {
        let _ = shutdown_rx.recv().await;

        info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
        match tokio::time::timeout(shutdown_timeout, cleanup).await {
            Ok(_) => info!("Cleanup completed successfully"),
            Err(_) => {
                tracing::warn!(
                    "Cleanup exceeded timeout of {:?}, forcing shutdown",
                    shutdown_timeout
                );
            }
        }
    });

    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move { shutdown_handle.wait_for_signal().await })
        .await
        .inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        });

    // A server error skips the signal path, so release cleanup here too.
    coordinator.shutdown();
    cleanup_handle.await.ok();

    serve_result
}
