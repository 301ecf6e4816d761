//! Membership fee ledger service

use std::{collections::HashMap, sync::Arc};

use mockable::Clock;

use crate::{
    error::AppResult,
    models::fee::{FeeEntry, FeeRecord, StudentWithFee},
    repository::Repository,
};

#[derive(Clone)]
pub struct FeesService {
    repository: Repository,
    clock: Arc<dyn Clock>,
}

impl FeesService {
    pub fn new(repository: Repository, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Record a payment, replacing the student's previous fee entry
    pub async fn upsert_fee(&self, entry: FeeEntry) -> AppResult<FeeRecord> {
        let stored = self.repository.fees.upsert(&entry).await?;
        let record = FeeRecord::derive(stored, self.clock.utc())?;

        tracing::info!(
            email = %record.student_email,
            next_payment = %record.next_payment_date,
            overdue = record.overdue,
            "Fee recorded"
        );

        Ok(record)
    }

    /// Every student once, in roster order, with their fee state
    pub async fn list_students_with_fees(&self) -> AppResult<Vec<StudentWithFee>> {
        let now = self.clock.utc();
        let students = self.repository.students.list().await?;

        let mut fees = HashMap::new();
        for entry in self.repository.fees.list().await? {
            let record = FeeRecord::derive(entry, now)?;
            fees.insert(record.student_email.clone(), record);
        }

        Ok(students
            .into_iter()
            .map(|student| {
                let fee = fees.get(&student.email);
                StudentWithFee::join(student, fee)
            })
            .collect())
    }
}
