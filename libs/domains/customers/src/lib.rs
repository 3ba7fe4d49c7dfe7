//! Customers Domain
//!
//! Customer records exposed over HTTP: validation, password hashing,
//! username/email uniqueness and filtered listing.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, OpenAPI doc
//! └──────┬──────┘
//!        │  codec: JSON ⇄ Customer
//! ┌──────▼──────┐
//! │   Service   │  ← Uniqueness, hashing, lifecycle
//! └──────┬──────┘
//!        │  filter: CustomerQuery
//! ┌──────▼──────┐
//! │ Repository  │  ← Store trait + in-memory and PostgreSQL stores
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Customer, Gender, sea-orm entity
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use axum::Router;
//! use domain_customers::{
//!     entity, handlers,
//!     repository::InMemoryCustomerRepository,
//!     service::CustomerService,
//! };
//!
//! let service = CustomerService::new(InMemoryCustomerRepository::new());
//! let app: Router = Router::new().nest(entity::URL, handlers::router(service));
//! ```

pub mod codec;
pub mod entity;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod hashing;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{CustomerError, CustomerResult};
pub use filter::{Condition, CustomerListParams, CustomerQuery, TextField, TextMatch};
pub use handlers::ApiDoc;
pub use hashing::hash_password;
pub use models::{Customer, Gender};
pub use postgres::PgCustomerRepository;
pub use repository::{CustomerRepository, InMemoryCustomerRepository};
pub use service::CustomerService;
