//! Loan management service

use std::sync::Arc;

use chrono::NaiveDate;
use mockable::Clock;

use crate::{
    error::{AppError, AppResult},
    models::loan::{LoanDetails, NewLoan},
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
    clock: Arc<dyn Clock>,
}

impl LoansService {
    pub fn new(repository: Repository, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    fn today(&self) -> NaiveDate {
        self.clock.utc().date_naive()
    }

    /// Lend a book to a student.
    ///
    /// The book is checked before the student, so a book with no copies left
    /// is refused whoever asks for it. The copy is taken with a conditional
    /// decrement; the loan insert that follows is not rolled back if it
    /// fails.
    pub async fn lend(&self, loan: NewLoan) -> AppResult<LoanDetails> {
        let book = self
            .repository
            .books
            .find_by_isbn(&loan.book_isbn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with ISBN {} not found", loan.book_isbn)))?;

        if book.counter <= 0 {
            return Err(AppError::NotFound(format!(
                "No copies of {} available",
                loan.book_isbn
            )));
        }

        self.repository
            .students
            .find_by_email(&loan.borrower_email)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Student {} not found", loan.borrower_email))
            })?;

        if !self.repository.books.take_copy(&loan.book_isbn).await? {
            // Last copy went to a concurrent request
            return Err(AppError::NotFound(format!(
                "No copies of {} available",
                loan.book_isbn
            )));
        }

        let record = self.repository.loans.insert(&loan).await?;

        tracing::info!(
            loan_id = record.id,
            isbn = %record.book_isbn,
            borrower = %record.borrower_email,
            "Book lent"
        );

        Ok(record.details(self.today()))
    }

    /// Return a lent book; yields the calendar date of the return
    pub async fn return_book(&self, book_isbn: &str, borrower_email: &str) -> AppResult<NaiveDate> {
        let loan = self
            .repository
            .loans
            .find_active(book_isbn, borrower_email)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "No active loan of {} for {}",
                    book_isbn, borrower_email
                ))
            })?;

        let now = self.clock.utc();
        if !self.repository.loans.mark_returned(loan.id, now).await? {
            return Err(AppError::NotFound(format!(
                "No active loan of {} for {}",
                book_isbn, borrower_email
            )));
        }

        if !self.repository.books.return_copy(book_isbn).await? {
            tracing::warn!(isbn = %book_isbn, "Returned book is missing from the catalog");
        }

        tracing::info!(loan_id = loan.id, isbn = %book_isbn, borrower = %borrower_email, "Book returned");

        Ok(now.date_naive())
    }

    /// All loans, active and returned, with derived status
    pub async fn list_loans(&self) -> AppResult<Vec<LoanDetails>> {
        let today = self.today();
        let loans = self.repository.loans.list().await?;
        Ok(loans.iter().map(|l| l.details(today)).collect())
    }
}
