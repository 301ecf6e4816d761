//! Student roster service

use crate::{
    error::{AppError, AppResult},
    models::student::Student,
    repository::Repository,
};

#[derive(Clone)]
pub struct RosterService {
    repository: Repository,
}

impl RosterService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Enrol a student; the email must not be registered yet
    pub async fn add_student(&self, student: Student) -> AppResult<Student> {
        if self
            .repository
            .students
            .find_by_email(&student.email)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "A student with this email already exists".to_string(),
            ));
        }

        let stored = self.repository.students.insert(&student).await?;
        tracing::info!(email = %stored.email, membership = %stored.membership, "Student added");
        Ok(stored)
    }

    pub async fn list_students(&self) -> AppResult<Vec<Student>> {
        self.repository.students.list().await
    }
}
