//! Students repository (roster)

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::student::Student,
};

/// Roster persistence, keyed by email
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Student>>;

    /// Ordered by last name, then first name
    async fn list(&self) -> AppResult<Vec<Student>>;

    /// Fails with `Conflict` when the email is already registered
    async fn insert(&self, student: &Student) -> AppResult<Student>;
}

#[derive(Clone)]
pub struct StudentsRepository {
    pool: Pool<Postgres>,
}

impl StudentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StudentStore for StudentsRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Student>> {
        let student = sqlx::query_as::<_, Student>(
            "SELECT email, first_name, last_name, membership, start_date FROM students WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(student)
    }

    async fn list(&self) -> AppResult<Vec<Student>> {
        let students = sqlx::query_as::<_, Student>(
            r#"
            SELECT email, first_name, last_name, membership, start_date
            FROM students
            ORDER BY last_name, first_name, email
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(students)
    }

    async fn insert(&self, student: &Student) -> AppResult<Student> {
        sqlx::query_as::<_, Student>(
            r#"
            INSERT INTO students (email, first_name, last_name, membership, start_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING email, first_name, last_name, membership, start_date
            "#,
        )
        .bind(&student.email)
        .bind(&student.first_name)
        .bind(&student.last_name)
        .bind(student.membership)
        .bind(student.start_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("A student with this email already exists".to_string())
            }
            e => e.into(),
        })
    }
}
