//! Book catalog service

use crate::{
    error::AppResult,
    models::book::{Book, NewBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Add copies of a book; returns the stored book and whether it is new.
    ///
    /// An existing ISBN keeps its counter and gains `copies` more.
    pub async fn add_book(&self, book: NewBook) -> AppResult<(Book, bool)> {
        let (stored, created) = self.repository.books.add_copies(&book).await?;
        tracing::info!(
            isbn = %stored.isbn,
            added = book.copies,
            counter = stored.counter,
            created,
            "Book stocked"
        );
        Ok((stored, created))
    }

    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list().await
    }
}
