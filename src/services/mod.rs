//! Business logic services

pub mod auth;
pub mod catalog;
pub mod fees;
pub mod loans;
pub mod roster;

use std::sync::Arc;

use mockable::Clock;

use crate::{config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub roster: roster::RosterService,
    pub loans: loans::LoansService,
    pub fees: fees::FeesService,
}

impl Services {
    /// Create all services with the given repository and clock
    pub fn new(repository: Repository, auth_config: AuthConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            auth: auth::AuthService::new(repository.clone(), auth_config, clock.clone()),
            catalog: catalog::CatalogService::new(repository.clone()),
            roster: roster::RosterService::new(repository.clone()),
            loans: loans::LoansService::new(repository.clone(), clock.clone()),
            fees: fees::FeesService::new(repository, clock),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
    use mockable::Clock;

    use crate::{
        models::{
            book::NewBook,
            student::{Membership, Student},
        },
        repository::Repository,
    };

    pub(crate) struct FixtureClock {
        pub utc_now: DateTime<Utc>,
    }

    impl Clock for FixtureClock {
        fn local(&self) -> DateTime<Local> {
            self.utc_now.with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            self.utc_now
        }
    }

    pub(crate) fn clock_at(y: i32, m: u32, d: u32) -> Arc<dyn Clock> {
        Arc::new(FixtureClock {
            utc_now: Utc
                .with_ymd_and_hms(y, m, d, 10, 30, 0)
                .single()
                .expect("valid fixture timestamp"),
        })
    }

    pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    pub(crate) fn student(email: &str) -> Student {
        Student {
            email: email.to_string(),
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            membership: Membership::Basic,
            start_date: date(2024, 1, 1),
        }
    }

    pub(crate) fn book(isbn: &str, copies: i32) -> NewBook {
        NewBook {
            isbn: isbn.to_string(),
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            publish_date: None,
            copies,
        }
    }

    pub(crate) async fn seed(repository: &Repository, isbn: &str, copies: i32, email: &str) {
        repository
            .books
            .add_copies(&book(isbn, copies))
            .await
            .expect("book seeded");
        repository
            .students
            .insert(&student(email))
            .await
            .expect("student seeded");
    }
}
