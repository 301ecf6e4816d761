//! Fees repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::fee::FeeEntry};

/// Fee ledger persistence, one entry per student email
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeeStore: Send + Sync {
    /// Create the entry or overwrite every field of the existing one
    async fn upsert(&self, entry: &FeeEntry) -> AppResult<FeeEntry>;

    async fn list(&self) -> AppResult<Vec<FeeEntry>>;
}

#[derive(Clone)]
pub struct FeesRepository {
    pool: Pool<Postgres>,
}

impl FeesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeeStore for FeesRepository {
    async fn upsert(&self, entry: &FeeEntry) -> AppResult<FeeEntry> {
        let stored = sqlx::query_as::<_, FeeEntry>(
            r#"
            INSERT INTO fees (student_email, membership, fee, last_payment_date)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (student_email) DO UPDATE SET
                membership = EXCLUDED.membership,
                fee = EXCLUDED.fee,
                last_payment_date = EXCLUDED.last_payment_date
            RETURNING student_email, membership, fee, last_payment_date
            "#,
        )
        .bind(&entry.student_email)
        .bind(entry.membership)
        .bind(entry.fee)
        .bind(entry.last_payment_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(stored)
    }

    async fn list(&self) -> AppResult<Vec<FeeEntry>> {
        let entries = sqlx::query_as::<_, FeeEntry>(
            "SELECT student_email, membership, fee, last_payment_date FROM fees",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }
}
