//! Conversion between the wire mapping and [`Customer`].
//!
//! Deserialization is done by hand over a [`serde_json::Value`] instead of a
//! derived `Deserialize` so every failure maps onto a specific
//! [`CustomerError`] kind and the first missing key is reported by name.

use serde_json::{Map, Value, json};
use std::str::FromStr;
use validator::Validate;

use crate::error::{CustomerError, CustomerResult};
use crate::models::{Customer, Gender};

/// Keys read from an inbound mapping, in the order they are checked
pub const FIELDS: [&str; 8] = [
    "username",
    "password",
    "first_name",
    "last_name",
    "gender",
    "active",
    "address",
    "email",
];

/// Render a customer as a flat JSON object.
pub fn serialize(customer: &Customer) -> Value {
    json!({
        "id": customer.id,
        "username": customer.username,
        "password": customer.password,
        "first_name": customer.first_name,
        "last_name": customer.last_name,
        "gender": customer.gender.to_string(),
        "active": customer.active,
        "address": customer.address,
        "email": customer.email,
    })
}

/// Build a transient customer from a JSON object.
///
/// Any `id` in the input is ignored.
pub fn deserialize(data: &Value) -> CustomerResult<Customer> {
    let map = data.as_object().ok_or_else(|| {
        CustomerError::InvalidType("body of request contained bad or no data".to_string())
    })?;

    let customer = Customer {
        id: None,
        username: text(map, "username")?,
        password: text(map, "password")?,
        first_name: text(map, "first_name")?,
        last_name: text(map, "last_name")?,
        gender: gender(map)?,
        active: active(map)?,
        address: text(map, "address")?,
        email: text(map, "email")?,
    };

    customer.validate().map_err(|errors| {
        // Name the offending fields only; values may hold a plaintext password.
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_keys()
            .map(|field| field.into_owned())
            .collect();
        fields.sort_unstable();
        CustomerError::InvalidAttribute(fields.join(", "))
    })?;

    Ok(customer)
}

fn field<'a>(map: &'a Map<String, Value>, key: &str) -> CustomerResult<&'a Value> {
    map.get(key)
        .ok_or_else(|| CustomerError::MissingField(key.to_string()))
}

fn text(map: &Map<String, Value>, key: &str) -> CustomerResult<String> {
    field(map, key)?
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| CustomerError::InvalidType(format!("Invalid type for {} String", key)))
}

fn gender(map: &Map<String, Value>) -> CustomerResult<Gender> {
    let token = field(map, "gender")?
        .as_str()
        .ok_or_else(|| CustomerError::InvalidType("Invalid type for gender String".to_string()))?;

    Gender::from_str(token).map_err(|_| CustomerError::InvalidAttribute(token.to_string()))
}

fn active(map: &Map<String, Value>) -> CustomerResult<bool> {
    let value = field(map, "active")?;
    value.as_bool().ok_or_else(|| {
        CustomerError::InvalidType(format!("Invalid type for active Boolean: {}", value))
    })
}
