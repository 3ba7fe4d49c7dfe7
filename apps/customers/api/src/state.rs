//! Shared application state.

use sea_orm::DatabaseConnection;

/// Cloned into each router that needs it; the connection pool is shared.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub db: DatabaseConnection,
}
