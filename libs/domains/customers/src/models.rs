use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::Display;
use utoipa::ToSchema;
use validator::Validate;

/// Gender of a customer
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "gender")]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Gender {
    #[sea_orm(string_value = "MALE")]
    Male,
    #[sea_orm(string_value = "FEMALE")]
    Female,
    #[default]
    #[sea_orm(string_value = "UNKNOWN")]
    Unknown,
}

// Parsed by hand: `DeriveActiveEnum` already provides `TryFrom<&str>`.
impl FromStr for Gender {
    type Err = strum::ParseError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "MALE" => Ok(Self::Male),
            "FEMALE" => Ok(Self::Female),
            "UNKNOWN" => Ok(Self::Unknown),
            _ => Err(strum::ParseError::VariantNotFound),
        }
    }
}

/// Customer record
///
/// `id` is `None` until the record has been persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, Validate)]
pub struct Customer {
    /// Store-assigned identifier
    pub id: Option<i32>,
    /// Unique login name
    #[validate(length(min = 1, max = 255))]
    pub username: String,
    /// Plaintext on input, SHA-256 hex digest once persisted
    pub password: String,
    #[validate(length(max = 255))]
    pub first_name: String,
    #[validate(length(max = 255))]
    pub last_name: String,
    pub gender: Gender,
    pub active: bool,
    #[validate(length(max = 255))]
    pub address: String,
    /// Unique contact address
    #[validate(length(max = 255))]
    pub email: String,
}

impl Customer {
    /// Stable identifier for log lines, `0` while transient.
    pub fn log_id(&self) -> i32 {
        self.id.unwrap_or_default()
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = self
            .id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "None".to_string());
        write!(
            f,
            "<Customer ('{}', '{}') id=[{}]>",
            self.first_name, self.last_name, id
        )
    }
}
