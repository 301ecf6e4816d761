//! Membership fee model and the monthly fee cycle

use chrono::{DateTime, Months, NaiveDate, NaiveTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::{
    fields::{parse_date, required},
    student::{parse_membership, Membership, Student},
};
use crate::error::{AppError, AppResult};

/// Length of one fee cycle
pub const FEE_CYCLE: Months = Months::new(1);

/// Largest amount a `NUMERIC(10, 2)` fee column holds: 99999999.99
pub const MAX_FEE: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// Date the next payment falls due; a day missing from the target month is
/// clamped to that month's last day.
pub fn next_payment_date(last_payment_date: NaiveDate) -> AppResult<NaiveDate> {
    last_payment_date
        .checked_add_months(FEE_CYCLE)
        .ok_or_else(|| AppError::Validation("lastPaymentDate is out of range".to_string()))
}

/// A fee is overdue once `now` passes the start of the next payment day
pub fn is_overdue(last_payment_date: NaiveDate, now: DateTime<Utc>) -> AppResult<bool> {
    let due = next_payment_date(last_payment_date)?;
    Ok(now > due.and_time(NaiveTime::MIN).and_utc())
}

/// Stored fee entry; overdue state is never persisted
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct FeeEntry {
    pub student_email: String,
    pub membership: Membership,
    pub fee: Decimal,
    pub last_payment_date: NaiveDate,
}

/// Fee record with the derived payment state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeeRecord {
    pub student_email: String,
    pub membership: Membership,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub fee: Decimal,
    pub last_payment_date: NaiveDate,
    pub next_payment_date: NaiveDate,
    pub overdue: bool,
}

impl FeeRecord {
    pub fn derive(entry: FeeEntry, now: DateTime<Utc>) -> AppResult<Self> {
        Ok(Self {
            next_payment_date: next_payment_date(entry.last_payment_date)?,
            overdue: is_overdue(entry.last_payment_date, now)?,
            student_email: entry.student_email,
            membership: entry.membership,
            fee: entry.fee,
            last_payment_date: entry.last_payment_date,
        })
    }
}

/// Manage fee request
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManageFeeRequest {
    /// Student email
    pub email: Option<String>,
    pub membership: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub fee: Option<Decimal>,
    /// YYYY-MM-DD
    pub last_payment_date: Option<String>,
}

impl ManageFeeRequest {
    pub fn into_entry(self) -> AppResult<FeeEntry> {
        let student_email = required(&self.email, "email")?.to_string();
        let membership = parse_membership(required(&self.membership, "membership")?)?;
        let fee = self
            .fee
            .ok_or_else(|| AppError::Validation("fee is required".to_string()))?;
        if fee.is_sign_negative() {
            return Err(AppError::Validation("fee must not be negative".to_string()));
        }
        // Stored with two decimal places, rounded the way PostgreSQL rounds
        let fee = fee.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        if fee > MAX_FEE {
            return Err(AppError::Validation(format!("fee must not exceed {}", MAX_FEE)));
        }
        let last_payment_date = parse_date(
            required(&self.last_payment_date, "lastPaymentDate")?,
            "lastPaymentDate",
        )?;
        // Refuse entries whose next due date cannot be derived later
        next_payment_date(last_payment_date)?;

        Ok(FeeEntry {
            student_email,
            membership,
            fee,
            last_payment_date,
        })
    }
}

/// Manage fee response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ManageFeeResponse {
    pub message: String,
    pub record: FeeRecord,
}

/// Student joined with their fee record (defaults when none exists)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentWithFee {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub membership: Membership,
    pub start_date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub fee: Decimal,
    /// YYYY-MM-DD, or empty when no payment was ever recorded
    pub last_payment_date: String,
    pub overdue: bool,
}

impl StudentWithFee {
    pub fn join(student: Student, fee: Option<&FeeRecord>) -> Self {
        Self {
            email: student.email,
            first_name: student.first_name,
            last_name: student.last_name,
            membership: student.membership,
            start_date: student.start_date,
            fee: fee.map(|f| f.fee).unwrap_or(Decimal::ZERO),
            last_payment_date: fee
                .map(|f| f.last_payment_date.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            overdue: fee.map(|f| f.overdue).unwrap_or(false),
        }
    }
}
