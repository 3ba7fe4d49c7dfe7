use axum::{
    Json, Router,
    extract::{Query, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::{get, put},
};
use axum_helpers::{
    AppError, IdPath, JsonBody,
    errors::handlers::method_not_allowed,
    errors::responses::{
        BadRequestResponse, InternalServerErrorResponse, NotFoundResponse,
        UnsupportedMediaTypeResponse,
    },
};
use serde_json::Value;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::codec;
use crate::entity;
use crate::error::{CustomerError, CustomerResult};
use crate::filter::{CustomerListParams, CustomerQuery};
use crate::models::{Customer, Gender};
use crate::repository::CustomerRepository;
use crate::service::CustomerService;

/// OpenAPI documentation for Customers API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_customers,
        create_customer,
        get_customer,
        update_customer,
        delete_customer,
        activate_customer,
        deactivate_customer,
    ),
    components(
        schemas(Customer, Gender),
        responses(
            NotFoundResponse,
            BadRequestResponse,
            UnsupportedMediaTypeResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = entity::TAG, description = "Customer management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the customer router. Mount it at [`entity::URL`].
pub fn router<R: CustomerRepository + 'static>(service: CustomerService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route(
            "/",
            get(list_customers)
                .post(create_customer)
                .fallback(method_not_allowed),
        )
        .route(
            "/{id}",
            get(get_customer)
                .put(update_customer)
                .delete(delete_customer)
                .fallback(method_not_allowed),
        )
        .route(
            "/{id}/activate",
            put(activate_customer).fallback(method_not_allowed),
        )
        .route(
            "/{id}/deactivate",
            put(deactivate_customer).fallback(method_not_allowed),
        )
        .with_state(shared_service)
}

/// `Location` of a stored customer; absolute when the request named a host.
fn location(headers: &HeaderMap, id: i32) -> String {
    let path = format!("{}/{}", entity::URL, id);
    match headers.get(header::HOST).and_then(|host| host.to_str().ok()) {
        Some(host) => {
            let scheme = headers
                .get("x-forwarded-proto")
                .and_then(|proto| proto.to_str().ok())
                .unwrap_or("http");
            format!("{}://{}{}", scheme, host, path)
        }
        None => path,
    }
}

async fn find_or_404<R: CustomerRepository>(
    service: &CustomerService<R>,
    id: i32,
) -> CustomerResult<Customer> {
    service.find(id).await?.ok_or(CustomerError::NotFound(id))
}

/// List customers, optionally filtered
#[utoipa::path(
    get,
    path = "",
    tag = entity::TAG,
    params(CustomerListParams),
    responses(
        (status = 200, description = "Matching customers", body = Vec<Customer>),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_customers<R: CustomerRepository>(
    State(service): State<Arc<CustomerService<R>>>,
    Query(params): Query<CustomerListParams>,
) -> CustomerResult<Json<Vec<Value>>> {
    let query = CustomerQuery::try_from(params)?;
    let customers = service.list(&query).await?;

    tracing::info!("Returning {} customers", customers.len());
    Ok(Json(customers.iter().map(codec::serialize).collect()))
}

/// Create a new customer
#[utoipa::path(
    post,
    path = "",
    tag = entity::TAG,
    request_body = Customer,
    responses(
        (status = 201, description = "Customer created", body = Customer,
            headers(("Location" = String, description = "URL of the new customer"))),
        (status = 400, response = BadRequestResponse),
        (status = 415, response = UnsupportedMediaTypeResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_customer<R: CustomerRepository>(
    State(service): State<Arc<CustomerService<R>>>,
    headers: HeaderMap,
    JsonBody(body): JsonBody,
) -> CustomerResult<impl IntoResponse> {
    let customer = codec::deserialize(&body)?;
    let created = service.create(customer).await?;

    let id = created.id.ok_or(CustomerError::NoValidId)?;
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location(&headers, id))],
        Json(codec::serialize(&created)),
    ))
}

/// Get a customer by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = entity::TAG,
    params(
        ("id" = i32, Path, description = "Customer ID")
    ),
    responses(
        (status = 200, description = "Customer found", body = Customer),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_customer<R: CustomerRepository>(
    State(service): State<Arc<CustomerService<R>>>,
    IdPath(id): IdPath,
) -> CustomerResult<Json<Value>> {
    let customer = find_or_404(&service, id).await?;
    Ok(Json(codec::serialize(&customer)))
}

/// Replace every field of a customer
///
/// A password equal to the stored digest is kept; anything else is hashed.
#[utoipa::path(
    put,
    path = "/{id}",
    tag = entity::TAG,
    params(
        ("id" = i32, Path, description = "Customer ID")
    ),
    request_body = Customer,
    responses(
        (status = 200, description = "Customer updated", body = Customer),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 415, response = UnsupportedMediaTypeResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_customer<R: CustomerRepository>(
    State(service): State<Arc<CustomerService<R>>>,
    IdPath(id): IdPath,
    body: Result<JsonBody, AppError>,
) -> Result<Json<Value>, AppError> {
    // Content type is checked before existence, the body after it.
    let body = match body {
        Err(rejection)
            if matches!(
                rejection,
                AppError::JsonExtractorRejection(JsonRejection::MissingJsonContentType(_))
            ) =>
        {
            return Err(rejection);
        }
        body => body,
    };

    let stored = find_or_404(&service, id).await?;
    let JsonBody(body) = body?;

    let mut customer = codec::deserialize(&body)?;
    customer.id = Some(id);
    let updated = service
        .update(customer, Some(stored.password.as_str()))
        .await?;

    Ok(Json(codec::serialize(&updated)))
}

/// Delete a customer
///
/// Deleting an unknown ID also succeeds.
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = entity::TAG,
    params(
        ("id" = i32, Path, description = "Customer ID")
    ),
    responses(
        (status = 204, description = "Customer deleted"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_customer<R: CustomerRepository>(
    State(service): State<Arc<CustomerService<R>>>,
    IdPath(id): IdPath,
) -> CustomerResult<StatusCode> {
    if let Some(customer) = service.find(id).await? {
        service.delete(&customer).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Activate a customer
#[utoipa::path(
    put,
    path = "/{id}/activate",
    tag = entity::TAG,
    params(
        ("id" = i32, Path, description = "Customer ID")
    ),
    responses(
        (status = 204, description = "Customer activated"),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn activate_customer<R: CustomerRepository>(
    State(service): State<Arc<CustomerService<R>>>,
    IdPath(id): IdPath,
) -> CustomerResult<StatusCode> {
    let mut customer = find_or_404(&service, id).await?;
    service.activate(&mut customer).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Deactivate a customer
#[utoipa::path(
    put,
    path = "/{id}/deactivate",
    tag = entity::TAG,
    params(
        ("id" = i32, Path, description = "Customer ID")
    ),
    responses(
        (status = 204, description = "Customer deactivated"),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn deactivate_customer<R: CustomerRepository>(
    State(service): State<Arc<CustomerService<R>>>,
    IdPath(id): IdPath,
) -> CustomerResult<StatusCode> {
    let mut customer = find_or_404(&service, id).await?;
    service.deactivate(&mut customer).await?;
    Ok(StatusCode::NO_CONTENT)
}
