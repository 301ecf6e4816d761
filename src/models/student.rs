//! Student (roster) model and membership plans

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;

use super::fields::{is_allowed_email, parse_date, required};
use crate::error::{AppError, AppResult};

/// Membership plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Membership {
    Basic,
    Standard,
    Premium,
}

impl Membership {
    pub fn as_str(&self) -> &'static str {
        match self {
            Membership::Basic => "Basic",
            Membership::Standard => "Standard",
            Membership::Premium => "Premium",
        }
    }
}

impl std::fmt::Display for Membership {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Membership {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(Membership::Basic),
            "standard" => Ok(Membership::Standard),
            "premium" => Ok(Membership::Premium),
            _ => Err(format!("Invalid membership plan: {}", s)),
        }
    }
}

// SQLx conversion for Membership (stored as TEXT)
impl sqlx::Type<Postgres> for Membership {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for Membership {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for Membership {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

/// Parse a membership plan supplied by a client
pub fn parse_membership(value: &str) -> AppResult<Membership> {
    value.parse().map_err(AppError::Validation)
}

/// Student from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub membership: Membership,
    pub start_date: NaiveDate,
}

/// Add student request
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddStudentRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    /// Basic, Standard or Premium
    pub membership_plan: Option<String>,
    /// YYYY-MM-DD
    pub start_date: Option<String>,
}

impl AddStudentRequest {
    pub fn into_student(self) -> AppResult<Student> {
        let first_name = required(&self.first_name, "firstName")?.to_string();
        let last_name = required(&self.last_name, "lastName")?.to_string();
        let email = required(&self.email, "email")?.to_string();
        let membership = parse_membership(required(&self.membership_plan, "membershipPlan")?)?;
        let start_date = parse_date(required(&self.start_date, "startDate")?, "startDate")?;

        if !is_allowed_email(&email) {
            return Err(AppError::Validation(
                "Please enter an email address with a valid domain (e.g., gmail.com, yahoo.com)."
                    .to_string(),
            ));
        }

        Ok(Student {
            email,
            first_name,
            last_name,
            membership,
            start_date,
        })
    }
}
