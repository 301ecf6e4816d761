//! Repository layer for database operations

pub mod books;
pub mod fees;
pub mod librarians;
pub mod loans;
#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod students;

use std::sync::Arc;

use sqlx::{Pool, Postgres};

pub use books::BookStore;
pub use fees::FeeStore;
pub use librarians::LibrarianStore;
pub use loans::LoanStore;
pub use students::StudentStore;

/// Main repository struct holding one handle per collection
#[derive(Clone)]
pub struct Repository {
    pub librarians: Arc<dyn LibrarianStore>,
    pub books: Arc<dyn BookStore>,
    pub students: Arc<dyn StudentStore>,
    pub loans: Arc<dyn LoanStore>,
    pub fees: Arc<dyn FeeStore>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            librarians: Arc::new(librarians::LibrariansRepository::new(pool.clone())),
            books: Arc::new(books::BooksRepository::new(pool.clone())),
            students: Arc::new(students::StudentsRepository::new(pool.clone())),
            loans: Arc::new(loans::LoansRepository::new(pool.clone())),
            fees: Arc::new(fees::FeesRepository::new(pool)),
        }
    }

    /// Repository backed by a fresh in-memory store
    #[cfg(any(test, feature = "test-support"))]
    pub fn in_memory() -> Self {
        let store = memory::MemoryStore::new();
        Self {
            librarians: Arc::new(store.clone()),
            books: Arc::new(store.clone()),
            students: Arc::new(store.clone()),
            loans: Arc::new(store.clone()),
            fees: Arc::new(store),
        }
    }
}
