use axum::Router;
use std::path::Path;
use tower_http::services::ServeDir;

pub mod customers;
pub mod health;

/// Browser admin page, linked from `/`
pub const ADMIN_PAGE: &str = "/static/index.html";

/// Creates the API routes.
///
/// Returns a stateless Router (all sub-routers have state already applied).
pub fn routes(state: &crate::state::AppState) -> Router {
    Router::new().nest(domain_customers::entity::URL, customers::router(state))
}

/// Router with the /ready endpoint, which pings the database.
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}

/// Serves the admin page assets from `dir` under `/static`.
pub fn static_router(dir: &Path) -> Router {
    Router::new().nest_service(
        "/static",
        ServeDir::new(dir).append_index_html_on_directories(true),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Environment};
    use crate::state::AppState;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum_helpers::server::health_router;
    use core_config::server::ServerConfig;
    use database::postgres::PostgresConfig;
    use http_body_util::BodyExt;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use tower::ServiceExt;

    fn app() -> Router {
        let state = AppState {
            config: Config {
                app: core_config::app_info!(),
                database: PostgresConfig::new("postgresql://localhost/customers"),
                server: ServerConfig::default(),
                environment: Environment::Development,
                run_migrations: false,
                static_dir: Path::new(env!("CARGO_MANIFEST_DIR")).join("static"),
            },
            db: MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        };

        axum_helpers::create_router::<crate::openapi::ApiDoc>(routes(&state))
            .unwrap()
            .merge(health_router(state.config.app, Some(ADMIN_PAGE)))
            .merge(static_router(&state.config.static_dir))
    }

    async fn get(uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_index_and_health() {
        let (status, body) = get("/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "customers_api");
        assert_eq!(body["admin"], ADMIN_PAGE);

        let (status, body) = get("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({"status": "OK"}));
    }

    #[tokio::test]
    async fn test_openapi_lists_customer_routes() {
        let (status, body) = get("/api-docs/openapi.json").await;
        assert_eq!(status, StatusCode::OK);

        let paths = body["paths"].as_object().unwrap();
        assert!(paths.contains_key("/customers"), "{:?}", paths.keys());
        assert!(paths.contains_key("/customers/{id}"));
        assert!(paths.contains_key("/customers/{id}/activate"));
    }

    #[tokio::test]
    async fn test_unknown_path_is_json_404() {
        let (status, body) = get("/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_admin_page_is_served() {
        let response = app()
            .oneshot(Request::builder().uri(ADMIN_PAGE).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
        assert!(content_type.starts_with("text/html"), "{content_type}");

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let page = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(page.contains("Customer RESTful Service"));
        assert!(page.contains("/static/js/rest_api.js"));
    }

    #[tokio::test]
    async fn test_admin_script_is_served() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/static/js/rest_api.js")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let script = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(script.contains("/customers"));
    }
}
