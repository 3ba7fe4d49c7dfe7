use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use core_config::AppInfo;
use futures::future::join_all;
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::future::Future;
use std::pin::Pin;
use utoipa::ToSchema;

/// Liveness probe body
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Service information returned from `/`
#[derive(Debug, Serialize, ToSchema)]
pub struct IndexResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub docs: &'static str,
    /// Browser admin page, when the service ships one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<&'static str>,
}

#[derive(Clone, Copy)]
struct IndexState {
    app: AppInfo,
    admin: Option<&'static str>,
}

/// A boxed future for health checks with a string error
pub type HealthCheckFuture<'a> = Pin<Box<dyn Future<Output = Result<(), String>> + Send + 'a>>;

/// Runs multiple health checks concurrently and returns aggregated results.
///
/// The body holds `"status": "ready" | "not ready"` plus one
/// `"connected" | "disconnected"` entry per check.
///
/// # Example
/// ```ignore
/// let checks: Vec<(&str, HealthCheckFuture)> = vec![
///     ("database", Box::pin(async {
///         db.ping().await.map_err(|e| e.to_string())
///     })),
/// ];
/// run_health_checks(checks).await
/// ```
pub async fn run_health_checks(
    checks: Vec<(&str, HealthCheckFuture<'_>)>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let (names, futures): (Vec<_>, Vec<_>) = checks.into_iter().unzip();
    let results = join_all(futures).await;

    let mut body = Map::new();
    let mut all_healthy = true;

    for (name, result) in names.into_iter().zip(results) {
        let status = match result {
            Ok(()) => "connected",
            Err(e) => {
                tracing::error!("Readiness check failed: {} error: {:?}", name, e);
                all_healthy = false;
                "disconnected"
            }
        };
        body.insert(name.to_string(), json!(status));
    }

    body.insert(
        "status".to_string(),
        json!(if all_healthy { "ready" } else { "not ready" }),
    );

    if all_healthy {
        Ok((StatusCode::OK, Json(Value::Object(body))))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(Value::Object(body))))
    }
}

/// Health check endpoint handler. Always 200 while the process serves requests.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "OK" })
}

async fn index_handler(State(index): State<IndexState>) -> Json<IndexResponse> {
    Json(IndexResponse {
        name: index.app.name,
        version: index.app.version,
        docs: "/swagger-ui",
        admin: index.admin,
    })
}

/// Creates a router with the `/` info endpoint and the `/health` probe.
///
/// `admin_page` is linked from the `/` body when set.
///
/// # Example
/// ```ignore
/// use axum_helpers::server::health_router;
/// use core_config::app_info;
///
/// let app = Router::new()
///     .merge(health_router(app_info!(), Some("/static/index.html")))
///     .merge(ready_router(state));
/// ```
pub fn health_router(app_info: AppInfo, admin_page: Option<&'static str>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .with_state(IndexState {
            app: app_info,
            admin: admin_page,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_all_checks_pass() {
        let database: HealthCheckFuture = Box::pin(async { Ok(()) });
        let cache: HealthCheckFuture = Box::pin(async { Ok(()) });
        let checks = vec![("database", database), ("cache", cache)];

        let (status, Json(body)) = run_health_checks(checks).await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
        assert_eq!(body["database"], "connected");
    }

    #[tokio::test]
    async fn test_failed_check_is_unavailable() {
        let database: HealthCheckFuture = Box::pin(async { Err("connection refused".to_string()) });
        let checks = vec![("database", database)];

        let (status, Json(body)) = run_health_checks(checks).await.unwrap_err();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "not ready");
        assert_eq!(body["database"], "disconnected");
    }
}
