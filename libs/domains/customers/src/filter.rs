//! List query filtering.
//!
//! Request parameters are parsed once into a [`CustomerQuery`], a conjunction
//! of typed [`Condition`]s. The in-memory store evaluates it with
//! [`CustomerQuery::matches`]; the PostgreSQL store translates the same
//! conditions into SQL.

use serde::Deserialize;
use std::str::FromStr;
use utoipa::IntoParams;

use crate::error::{CustomerError, CustomerResult};
use crate::models::{Customer, Gender};

/// Text columns that can be filtered on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Username,
    Email,
    Address,
    FirstName,
    LastName,
}

impl TextField {
    pub const ALL: [TextField; 5] = [
        TextField::Username,
        TextField::Email,
        TextField::Address,
        TextField::FirstName,
        TextField::LastName,
    ];

    /// Query parameter name
    pub fn name(self) -> &'static str {
        match self {
            TextField::Username => "username",
            TextField::Email => "email",
            TextField::Address => "address",
            TextField::FirstName => "first_name",
            TextField::LastName => "last_name",
        }
    }

    pub fn value(self, customer: &Customer) -> &str {
        match self {
            TextField::Username => &customer.username,
            TextField::Email => &customer.email,
            TextField::Address => &customer.address,
            TextField::FirstName => &customer.first_name,
            TextField::LastName => &customer.last_name,
        }
    }
}

/// How a text parameter is compared
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextMatch {
    /// Case-sensitive equality, requested by wrapping the value in double quotes
    Exact(String),
    /// Case-insensitive substring; the needle is stored lower-cased
    Fuzzy(String),
}

impl TextMatch {
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix('"').and_then(|rest| rest.strip_suffix('"')) {
            Some(inner) => TextMatch::Exact(inner.to_string()),
            None => TextMatch::Fuzzy(raw.to_lowercase()),
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            TextMatch::Exact(expected) => value == expected,
            TextMatch::Fuzzy(needle) => value.to_lowercase().contains(needle.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Text(TextField, TextMatch),
    Gender(Gender),
    Active(bool),
}

impl Condition {
    /// Equality on a text column.
    pub fn equals(field: TextField, value: impl Into<String>) -> Self {
        Condition::Text(field, TextMatch::Exact(value.into()))
    }

    pub fn matches(&self, customer: &Customer) -> bool {
        match self {
            Condition::Text(field, text) => text.matches(field.value(customer)),
            Condition::Gender(gender) => customer.gender == *gender,
            Condition::Active(active) => customer.active == *active,
        }
    }
}

/// Conjunction of conditions; the empty query matches every record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerQuery {
    conditions: Vec<Condition>,
}

impl CustomerQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn matches(&self, customer: &Customer) -> bool {
        self.conditions.iter().all(|c| c.matches(customer))
    }
}

/// Query parameters accepted by `GET /customers`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CustomerListParams {
    /// Substring match, or exact match when wrapped in double quotes
    pub username: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// MALE, FEMALE or UNKNOWN (case-insensitive)
    pub gender: Option<String>,
    /// true/1 or false/0 (case-insensitive)
    pub active: Option<String>,
}

impl CustomerListParams {
    fn text(&self, field: TextField) -> Option<&str> {
        let value = match field {
            TextField::Username => &self.username,
            TextField::Email => &self.email,
            TextField::Address => &self.address,
            TextField::FirstName => &self.first_name,
            TextField::LastName => &self.last_name,
        };
        value.as_deref().filter(|v| !v.is_empty())
    }
}

impl TryFrom<CustomerListParams> for CustomerQuery {
    type Error = CustomerError;

    fn try_from(params: CustomerListParams) -> CustomerResult<Self> {
        let mut query = CustomerQuery::new();

        for field in TextField::ALL {
            if let Some(raw) = params.text(field) {
                query = query.with(Condition::Text(field, TextMatch::parse(raw)));
            }
        }

        if let Some(raw) = params.gender.as_deref() {
            query = query.with(Condition::Gender(parse_gender(raw)?));
        }

        if let Some(raw) = params.active.as_deref() {
            query = query.with(Condition::Active(parse_active(raw)?));
        }

        Ok(query)
    }
}

pub fn parse_gender(raw: &str) -> CustomerResult<Gender> {
    Gender::from_str(&raw.to_uppercase())
        .map_err(|_| CustomerError::InvalidGenderValue(raw.to_string()))
}

pub fn parse_active(raw: &str) -> CustomerResult<bool> {
    match raw.to_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(CustomerError::InvalidActiveValue(raw.to_string())),
    }
}
