/// Errors raised while connecting to or probing a database
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// PostgreSQL errors (SeaORM)
    #[cfg(feature = "postgres")]
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sea_orm::DbErr),

    /// Connection failed after retries
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    #[error("Migration error: {0}")]
    MigrationError(String),
}

/// Result type alias for database operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;
