//! Books repository (catalog)

use async_trait::async_trait;
use sqlx::{FromRow, Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, NewBook},
};

/// Message used when a counter would leave the INTEGER range
pub(crate) const COUNTER_OVERFLOW: &str = "copies would exceed the maximum shelf count";

// 22003: numeric_value_out_of_range
fn map_counter_overflow(e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::Database(db) if db.code().as_deref() == Some("22003") => {
            AppError::Validation(COUNTER_OVERFLOW.to_string())
        }
        e => e.into(),
    }
}

/// Catalog persistence, keyed by ISBN
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>>;

    async fn list(&self) -> AppResult<Vec<Book>>;

    /// Insert the book, or merge its metadata into the existing ISBN and add
    /// `copies` to the counter. Returns the stored book and whether it was
    /// newly inserted.
    async fn add_copies(&self, book: &NewBook) -> AppResult<(Book, bool)>;

    /// Take one copy off the shelf if any is left. `false` when the book is
    /// unknown or its counter is already zero.
    async fn take_copy(&self, isbn: &str) -> AppResult<bool>;

    /// Put one copy back on the shelf
    async fn return_copy(&self, isbn: &str) -> AppResult<bool>;
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for BooksRepository {
    async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            "SELECT isbn, title, author, publish_date, counter FROM books WHERE isbn = $1",
        )
        .bind(isbn)
        .fetch_optional(&self.pool)
        .await?;
        Ok(book)
    }

    async fn list(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            "SELECT isbn, title, author, publish_date, counter FROM books ORDER BY title, isbn",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    async fn add_copies(&self, book: &NewBook) -> AppResult<(Book, bool)> {
        // xmax is 0 only for freshly inserted tuples
        let row = sqlx::query(
            r#"
            INSERT INTO books (isbn, title, author, publish_date, counter)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (isbn) DO UPDATE SET
                title = EXCLUDED.title,
                author = EXCLUDED.author,
                publish_date = COALESCE(EXCLUDED.publish_date, books.publish_date),
                counter = books.counter + EXCLUDED.counter
            RETURNING isbn, title, author, publish_date, counter, (xmax = 0) AS inserted
            "#,
        )
        .bind(&book.isbn)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.publish_date)
        .bind(book.copies)
        .fetch_one(&self.pool)
        .await
        .map_err(map_counter_overflow)?;

        let stored = Book::from_row(&row)?;
        let inserted: bool = row.try_get("inserted")?;
        Ok((stored, inserted))
    }

    async fn take_copy(&self, isbn: &str) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE books SET counter = counter - 1 WHERE isbn = $1 AND counter > 0",
        )
        .bind(isbn)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn return_copy(&self, isbn: &str) -> AppResult<bool> {
        let result = sqlx::query("UPDATE books SET counter = counter + 1 WHERE isbn = $1")
            .bind(isbn)
            .execute(&self.pool)
            .await
            .map_err(map_counter_overflow)?;
        Ok(result.rows_affected() == 1)
    }
}
