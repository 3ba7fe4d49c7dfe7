use crate::models::{Customer, Gender};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;

/// Route prefix for the customers resource
pub const URL: &str = "/customers";

/// OpenAPI tag for the customers resource
pub const TAG: &str = "customers";

/// Sea-ORM Entity for the customers table
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub active: bool,
    pub address: String,
    #[sea_orm(unique)]
    pub email: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Customer {
    fn from(model: Model) -> Self {
        Self {
            id: Some(model.id),
            username: model.username,
            password: model.password,
            first_name: model.first_name,
            last_name: model.last_name,
            gender: model.gender,
            active: model.active,
            address: model.address,
            email: model.email,
        }
    }
}

// A transient customer leaves `id` to the sequence.
impl From<Customer> for ActiveModel {
    fn from(customer: Customer) -> Self {
        ActiveModel {
            id: customer.id.map_or(NotSet, Set),
            username: Set(customer.username),
            password: Set(customer.password),
            first_name: Set(customer.first_name),
            last_name: Set(customer.last_name),
            gender: Set(customer.gender),
            active: Set(customer.active),
            address: Set(customer.address),
            email: Set(customer.email),
        }
    }
}
