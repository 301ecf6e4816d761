//! In-memory store used by tests in place of PostgreSQL

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{books::COUNTER_OVERFLOW, BookStore, FeeStore, LibrarianStore, LoanStore, StudentStore};
use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, NewBook},
        fee::FeeEntry,
        librarian::{Librarian, LibrarianChanges, NewLibrarian},
        loan::{LoanRecord, NewLoan},
        student::Student,
    },
};

#[derive(Default)]
struct MemoryState {
    librarians: Vec<Librarian>,
    books: Vec<Book>,
    students: Vec<Student>,
    loans: Vec<LoanRecord>,
    fees: Vec<FeeEntry>,
}

/// Shared in-memory implementation of every store
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> AppResult<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| AppError::Internal("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl LibrarianStore for MemoryStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Librarian>> {
        Ok(self.state()?.librarians.iter().find(|l| l.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Librarian>> {
        Ok(self
            .state()?
            .librarians
            .iter()
            .find(|l| l.username == username)
            .cloned())
    }

    async fn username_exists(&self, username: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        Ok(self
            .state()?
            .librarians
            .iter()
            .any(|l| l.username == username && Some(l.id) != exclude_id))
    }

    async fn email_exists(&self, email: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        Ok(self
            .state()?
            .librarians
            .iter()
            .any(|l| l.email == email && Some(l.id) != exclude_id))
    }

    async fn insert(&self, librarian: &NewLibrarian) -> AppResult<Librarian> {
        let mut state = self.state()?;
        if state.librarians.iter().any(|l| l.username == librarian.username) {
            return Err(AppError::Conflict("Username already taken.".to_string()));
        }
        if state.librarians.iter().any(|l| l.email == librarian.email) {
            return Err(AppError::Conflict("Email already registered.".to_string()));
        }
        let id = state.librarians.iter().map(|l| l.id).max().unwrap_or(0) + 1;
        let stored = Librarian {
            id,
            first_name: librarian.first_name.clone(),
            last_name: librarian.last_name.clone(),
            username: librarian.username.clone(),
            email: librarian.email.clone(),
            password_hash: librarian.password_hash.clone(),
        };
        state.librarians.push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: i32, changes: &LibrarianChanges) -> AppResult<Option<Librarian>> {
        let mut state = self.state()?;
        let Some(librarian) = state.librarians.iter_mut().find(|l| l.id == id) else {
            return Ok(None);
        };
        if let Some(v) = &changes.first_name {
            librarian.first_name = v.clone();
        }
        if let Some(v) = &changes.last_name {
            librarian.last_name = v.clone();
        }
        if let Some(v) = &changes.username {
            librarian.username = v.clone();
        }
        if let Some(v) = &changes.email {
            librarian.email = v.clone();
        }
        if let Some(v) = &changes.password_hash {
            librarian.password_hash = v.clone();
        }
        Ok(Some(librarian.clone()))
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        Ok(self.state()?.books.iter().find(|b| b.isbn == isbn).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Book>> {
        let mut books = self.state()?.books.clone();
        books.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.isbn.cmp(&b.isbn)));
        Ok(books)
    }

    async fn add_copies(&self, book: &NewBook) -> AppResult<(Book, bool)> {
        let mut state = self.state()?;
        if let Some(existing) = state.books.iter_mut().find(|b| b.isbn == book.isbn) {
            let counter = existing
                .counter
                .checked_add(book.copies)
                .ok_or_else(|| AppError::Validation(COUNTER_OVERFLOW.to_string()))?;
            existing.title = book.title.clone();
            existing.author = book.author.clone();
            if book.publish_date.is_some() {
                existing.publish_date = book.publish_date.clone();
            }
            existing.counter = counter;
            return Ok((existing.clone(), false));
        }
        let stored = Book {
            isbn: book.isbn.clone(),
            title: book.title.clone(),
            author: book.author.clone(),
            publish_date: book.publish_date.clone(),
            counter: book.copies,
        };
        state.books.push(stored.clone());
        Ok((stored, true))
    }

    async fn take_copy(&self, isbn: &str) -> AppResult<bool> {
        let mut state = self.state()?;
        match state.books.iter_mut().find(|b| b.isbn == isbn && b.counter > 0) {
            Some(book) => {
                book.counter -= 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn return_copy(&self, isbn: &str) -> AppResult<bool> {
        let mut state = self.state()?;
        match state.books.iter_mut().find(|b| b.isbn == isbn) {
            Some(book) => {
                book.counter = book
                    .counter
                    .checked_add(1)
                    .ok_or_else(|| AppError::Validation(COUNTER_OVERFLOW.to_string()))?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl StudentStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Student>> {
        Ok(self.state()?.students.iter().find(|s| s.email == email).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Student>> {
        let mut students = self.state()?.students.clone();
        students.sort_by(|a, b| {
            a.last_name
                .cmp(&b.last_name)
                .then_with(|| a.first_name.cmp(&b.first_name))
                .then_with(|| a.email.cmp(&b.email))
        });
        Ok(students)
    }

    async fn insert(&self, student: &Student) -> AppResult<Student> {
        let mut state = self.state()?;
        if state.students.iter().any(|s| s.email == student.email) {
            return Err(AppError::Conflict(
                "A student with this email already exists".to_string(),
            ));
        }
        state.students.push(student.clone());
        Ok(student.clone())
    }
}

#[async_trait]
impl LoanStore for MemoryStore {
    async fn insert(&self, loan: &NewLoan) -> AppResult<LoanRecord> {
        let mut state = self.state()?;
        let id = state.loans.iter().map(|l| l.id).max().unwrap_or(0) + 1;
        let record = LoanRecord {
            id,
            book_isbn: loan.book_isbn.clone(),
            borrower_email: loan.borrower_email.clone(),
            borrow_date: loan.borrow_date,
            return_date: None,
        };
        state.loans.push(record.clone());
        Ok(record)
    }

    async fn find_active(&self, book_isbn: &str, borrower_email: &str) -> AppResult<Option<LoanRecord>> {
        Ok(self
            .state()?
            .loans
            .iter()
            .find(|l| l.book_isbn == book_isbn && l.borrower_email == borrower_email && l.is_active())
            .cloned())
    }

    async fn mark_returned(&self, id: i32, returned_at: DateTime<Utc>) -> AppResult<bool> {
        let mut state = self.state()?;
        match state.loans.iter_mut().find(|l| l.id == id && l.is_active()) {
            Some(loan) => {
                loan.return_date = Some(returned_at);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list(&self) -> AppResult<Vec<LoanRecord>> {
        Ok(self.state()?.loans.clone())
    }
}

#[async_trait]
impl FeeStore for MemoryStore {
    async fn upsert(&self, entry: &FeeEntry) -> AppResult<FeeEntry> {
        let mut state = self.state()?;
        match state
            .fees
            .iter_mut()
            .find(|f| f.student_email == entry.student_email)
        {
            Some(existing) => *existing = entry.clone(),
            None => state.fees.push(entry.clone()),
        }
        Ok(entry.clone())
    }

    async fn list(&self) -> AppResult<Vec<FeeEntry>> {
        Ok(self.state()?.fees.clone())
    }
}
