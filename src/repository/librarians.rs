//! Librarians repository (credential store)

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::librarian::{Librarian, LibrarianChanges, NewLibrarian},
};

/// Librarian account persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LibrarianStore: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Librarian>>;

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Librarian>>;

    /// Whether another account (other than `exclude_id`) uses this username
    async fn username_exists(&self, username: &str, exclude_id: Option<i32>) -> AppResult<bool>;

    /// Whether another account (other than `exclude_id`) uses this email
    async fn email_exists(&self, email: &str, exclude_id: Option<i32>) -> AppResult<bool>;

    async fn insert(&self, librarian: &NewLibrarian) -> AppResult<Librarian>;

    /// Replace the supplied fields; `None` when the account does not exist
    async fn update(&self, id: i32, changes: &LibrarianChanges) -> AppResult<Option<Librarian>>;
}

#[derive(Clone)]
pub struct LibrariansRepository {
    pool: Pool<Postgres>,
}

impl LibrariansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn map_unique_violation(e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            if db.constraint().is_some_and(|c| c.contains("email")) {
                AppError::Conflict("Email already registered.".to_string())
            } else {
                AppError::Conflict("Username already taken.".to_string())
            }
        }
        e => e.into(),
    }
}

#[async_trait]
impl LibrarianStore for LibrariansRepository {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Librarian>> {
        let librarian = sqlx::query_as::<_, Librarian>("SELECT * FROM librarians WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(librarian)
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Librarian>> {
        let librarian =
            sqlx::query_as::<_, Librarian>("SELECT * FROM librarians WHERE username = $1")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;
        Ok(librarian)
    }

    async fn username_exists(&self, username: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM librarians WHERE username = $1 AND ($2::INT IS NULL OR id != $2))",
        )
        .bind(username)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn email_exists(&self, email: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM librarians WHERE email = $1 AND ($2::INT IS NULL OR id != $2))",
        )
        .bind(email)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn insert(&self, librarian: &NewLibrarian) -> AppResult<Librarian> {
        sqlx::query_as::<_, Librarian>(
            r#"
            INSERT INTO librarians (first_name, last_name, username, email, password_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&librarian.first_name)
        .bind(&librarian.last_name)
        .bind(&librarian.username)
        .bind(&librarian.email)
        .bind(&librarian.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)
    }

    async fn update(&self, id: i32, changes: &LibrarianChanges) -> AppResult<Option<Librarian>> {
        sqlx::query_as::<_, Librarian>(
            r#"
            UPDATE librarians SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                username = COALESCE($4, username),
                email = COALESCE($5, email),
                password_hash = COALESCE($6, password_hash)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.first_name)
        .bind(&changes.last_name)
        .bind(&changes.username)
        .bind(&changes.email)
        .bind(&changes.password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_unique_violation)
    }
}
