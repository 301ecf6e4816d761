//! Book (catalog) model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::fields::required;
use crate::error::{AppError, AppResult};

/// Book from database; `counter` is the number of copies on the shelf
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub publish_date: Option<String>,
    pub counter: i32,
}

/// Add book request
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddBookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    /// Number of copies to add to the shelf
    pub copies: Option<i32>,
    pub publish_date: Option<String>,
}

/// Validated book addition: inserted as-is or merged into an existing ISBN
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub publish_date: Option<String>,
    pub copies: i32,
}

impl AddBookRequest {
    pub fn into_new_book(self) -> AppResult<NewBook> {
        let title = required(&self.title, "title")?.to_string();
        let author = required(&self.author, "author")?.to_string();
        let isbn = required(&self.isbn, "isbn")?.to_string();
        let copies = self
            .copies
            .ok_or_else(|| AppError::Validation("copies is required".to_string()))?;
        if copies < 1 {
            return Err(AppError::Validation("copies must be at least 1".to_string()));
        }
        let publish_date = self
            .publish_date
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(NewBook {
            isbn,
            title,
            author,
            publish_date,
            copies,
        })
    }
}

/// Add book response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AddBookResponse {
    pub message: String,
    pub book: Book,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> AddBookRequest {
        AddBookRequest {
            title: Some("Dune".to_string()),
            author: Some("Frank Herbert".to_string()),
            isbn: Some("9780441013593".to_string()),
            copies: Some(3),
            publish_date: Some("".to_string()),
        }
    }

    #[test]
    fn test_into_new_book() {
        let book = request().into_new_book().expect("valid book");
        assert_eq!(book.copies, 3);
        assert_eq!(book.publish_date, None);
    }

    #[test]
    fn test_missing_fields_rejected() {
        let no_isbn = AddBookRequest { isbn: None, ..request() };
        assert!(matches!(no_isbn.into_new_book(), Err(AppError::Validation(_))));

        let no_copies = AddBookRequest { copies: Some(0), ..request() };
        assert!(matches!(no_copies.into_new_book(), Err(AppError::Validation(_))));
    }
}
