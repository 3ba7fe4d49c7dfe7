//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for all APIs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Customers API",
        version = "0.1.0",
        description = "CRUD service for customer records"
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/customers", api = domain_customers::ApiDoc)
    )
)]
pub struct ApiDoc;
