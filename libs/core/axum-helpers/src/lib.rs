//! # Axum Helpers
//!
//! Shared plumbing for the service's Axum applications.
//!
//! ## Modules
//!
//! - **[`server`]**: Router assembly, index/health/readiness, graceful shutdown
//! - **[`http`]**: HTTP middleware (CORS, security headers)
//! - **[`errors`]**: Structured error responses with error codes
//! - **[`extractors`]**: Custom extractors (integer id path, JSON body)
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//! use core_config::{app_info, server::ServerConfig};
//! use utoipa::OpenApi;
//!
//! #[derive(OpenApi)]
//! #[openapi(paths())]
//! struct ApiDoc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api_routes = Router::new(); // Add your routes
//!     let router = create_router::<ApiDoc>(api_routes)?.merge(health_router(app_info!(), None));
//!
//!     let config = ServerConfig::default();
//!     create_production_app(router, &config, Duration::from_secs(30), async {}).await?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

// Re-export server types
pub use server::{
    HealthCheckFuture, HealthResponse, IndexResponse, ShutdownCoordinator, create_production_app,
    create_router, health_router, run_health_checks,
};

// Re-export HTTP middleware
pub use http::{cors_layer_from_env, security_headers};

// Re-export error types
pub use errors::{AppError, ErrorCode, ErrorResponse};

// Re-export extractors
pub use extractors::{IdPath, JsonBody};
