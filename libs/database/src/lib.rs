//! Database connectors and utilities.
//!
//! # Features
//!
//! - `postgres` (default) - PostgreSQL support with SeaORM
//! - `config` - `core_config::FromEnv` support for [`postgres::PostgresConfig`]
//!
//! # Example
//!
//! ```ignore
//! use database::postgres::{self, PostgresConfig};
//! use database::common::RetryConfig;
//! use migration::Migrator;
//!
//! let config = PostgresConfig::from_env()?;
//! let db = postgres::connect_from_config_with_retry(config, Some(RetryConfig::startup())).await?;
//! postgres::run_migrations::<Migrator>(&db, "customers_api").await?;
//! ```

pub mod common;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult};
