use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};
use tracing::debug;

use crate::common::DatabaseError;

/// Run `SELECT 1` to verify the pool can reach the server.
///
/// Used by the `/ready` probe.
pub async fn check_health(db: &DatabaseConnection) -> Result<(), DatabaseError> {
    let stmt = Statement::from_string(DatabaseBackend::Postgres, "SELECT 1".to_owned());
    db.query_one_raw(stmt)
        .await
        .map_err(|e| DatabaseError::HealthCheckFailed(format!("PostgreSQL: {}", e)))?;

    debug!("PostgreSQL health check passed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbErr, MockDatabase};

    #[tokio::test]
    async fn test_check_health_reports_query_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection reset".to_string())])
            .into_connection();

        let err = check_health(&db).await.unwrap_err();
        assert!(err.to_string().contains("connection reset"));
    }
}
