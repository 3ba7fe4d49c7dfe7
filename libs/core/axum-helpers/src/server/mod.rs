//! Server infrastructure module.
//!
//! - Router assembly with OpenAPI documentation
//! - Index, health and readiness endpoints
//! - Graceful shutdown coordination
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//! use core_config::{server::ServerConfig, app_info};
//!
//! let router = create_router::<ApiDoc>(api_routes)?
//!     .merge(health_router(app_info!(), None));
//!
//! create_production_app(router, &ServerConfig::default(), timeout, cleanup).await?;
//! ```

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{create_production_app, create_router};
pub use health::{HealthCheckFuture, HealthResponse, IndexResponse, health_router, run_health_checks};
pub use shutdown::ShutdownCoordinator;
