//! Loan (lend/return) model and related types

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::fields::{parse_date, required};
use crate::error::{AppError, AppResult};

/// Days a book may be kept before it is overdue
pub const LOAN_PERIOD_DAYS: i64 = 7;

/// Date a loan started on `borrow_date` falls due, if representable
pub fn due_date(borrow_date: NaiveDate) -> Option<NaiveDate> {
    borrow_date.checked_add_signed(Duration::days(LOAN_PERIOD_DAYS))
}

/// Loan record from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct LoanRecord {
    pub id: i32,
    pub book_isbn: String,
    pub borrower_email: String,
    pub borrow_date: NaiveDate,
    /// Set once, when the book comes back
    pub return_date: Option<DateTime<Utc>>,
}

/// Display status of a loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum LoanStatus {
    Borrowed,
    Overdue,
    Returned,
}

impl LoanRecord {
    pub fn is_active(&self) -> bool {
        self.return_date.is_none()
    }

    /// Saturates at the last representable date
    pub fn expected_return_date(&self) -> NaiveDate {
        due_date(self.borrow_date).unwrap_or(NaiveDate::MAX)
    }

    pub fn status(&self, today: NaiveDate) -> LoanStatus {
        if self.return_date.is_some() {
            LoanStatus::Returned
        } else if today > self.expected_return_date() {
            LoanStatus::Overdue
        } else {
            LoanStatus::Borrowed
        }
    }

    pub fn details(&self, today: NaiveDate) -> LoanDetails {
        LoanDetails {
            id: self.id,
            book_isbn: self.book_isbn.clone(),
            borrower_email: self.borrower_email.clone(),
            borrow_date: self.borrow_date,
            expected_return_date: self.expected_return_date(),
            return_date: self.return_date.map(|d| d.date_naive()),
            status: self.status(today),
        }
    }
}

/// Loan with derived dates and status for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoanDetails {
    pub id: i32,
    #[serde(rename = "bookISBN")]
    pub book_isbn: String,
    /// Student email, under the same name the lend and return requests use
    #[serde(rename = "borrowerName", alias = "borrowerEmail")]
    pub borrower_email: String,
    pub borrow_date: NaiveDate,
    pub expected_return_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub status: LoanStatus,
}

/// Validated lend request
#[derive(Debug, Clone, PartialEq)]
pub struct NewLoan {
    pub book_isbn: String,
    pub borrower_email: String,
    pub borrow_date: NaiveDate,
}

/// Lend book request; `borrowerName` carries the student's email
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LendBookRequest {
    #[serde(rename = "bookISBN")]
    pub book_isbn: Option<String>,
    #[serde(rename = "borrowerName", alias = "borrowerEmail")]
    pub borrower_email: Option<String>,
    /// YYYY-MM-DD
    #[serde(rename = "borrowDate")]
    pub borrow_date: Option<String>,
}

impl LendBookRequest {
    pub fn into_new_loan(self) -> AppResult<NewLoan> {
        let book_isbn = required(&self.book_isbn, "bookISBN")?.to_string();
        let borrower_email = required(&self.borrower_email, "borrowerName")?.to_string();
        let borrow_date = parse_date(required(&self.borrow_date, "borrowDate")?, "borrowDate")?;
        if due_date(borrow_date).is_none() {
            return Err(AppError::Validation("borrowDate is out of range".to_string()));
        }
        Ok(NewLoan {
            book_isbn,
            borrower_email,
            borrow_date,
        })
    }
}

/// Return book request
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ReturnBookRequest {
    #[serde(rename = "bookISBN")]
    pub book_isbn: Option<String>,
    #[serde(rename = "borrowerName", alias = "borrowerEmail")]
    pub borrower_email: Option<String>,
}

impl ReturnBookRequest {
    pub fn keys(&self) -> AppResult<(&str, &str)> {
        Ok((
            required(&self.book_isbn, "bookISBN")?,
            required(&self.borrower_email, "borrowerName")?,
        ))
    }
}

/// Lend response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LendBookResponse {
    pub message: String,
    pub loan: LoanDetails,
}

/// Return response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReturnBookResponse {
    pub message: String,
    pub actual_return_date: NaiveDate,
}
