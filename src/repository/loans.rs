//! Loans repository (borrowed books ledger)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::loan::{LoanRecord, NewLoan},
};

/// Loan ledger persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoanStore: Send + Sync {
    /// Record a lend event with no return date
    async fn insert(&self, loan: &NewLoan) -> AppResult<LoanRecord>;

    /// Oldest loan of this book to this borrower that is still out
    async fn find_active(&self, book_isbn: &str, borrower_email: &str) -> AppResult<Option<LoanRecord>>;

    /// Set the return date if the loan is still active. `false` when it was
    /// already returned.
    async fn mark_returned(&self, id: i32, returned_at: DateTime<Utc>) -> AppResult<bool>;

    /// Every loan, active and returned, in insertion order
    async fn list(&self) -> AppResult<Vec<LoanRecord>>;
}

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LoanStore for LoansRepository {
    async fn insert(&self, loan: &NewLoan) -> AppResult<LoanRecord> {
        let record = sqlx::query_as::<_, LoanRecord>(
            r#"
            INSERT INTO borrowed_books (book_isbn, borrower_email, borrow_date, return_date)
            VALUES ($1, $2, $3, NULL)
            RETURNING id, book_isbn, borrower_email, borrow_date, return_date
            "#,
        )
        .bind(&loan.book_isbn)
        .bind(&loan.borrower_email)
        .bind(loan.borrow_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(record)
    }

    async fn find_active(&self, book_isbn: &str, borrower_email: &str) -> AppResult<Option<LoanRecord>> {
        let record = sqlx::query_as::<_, LoanRecord>(
            r#"
            SELECT id, book_isbn, borrower_email, borrow_date, return_date
            FROM borrowed_books
            WHERE book_isbn = $1 AND borrower_email = $2 AND return_date IS NULL
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(book_isbn)
        .bind(borrower_email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    async fn mark_returned(&self, id: i32, returned_at: DateTime<Utc>) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE borrowed_books SET return_date = $1 WHERE id = $2 AND return_date IS NULL",
        )
        .bind(returned_at)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn list(&self) -> AppResult<Vec<LoanRecord>> {
        let records = sqlx::query_as::<_, LoanRecord>(
            "SELECT id, book_isbn, borrower_email, borrow_date, return_date FROM borrowed_books ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }
}
