//! Catalog endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::book::{AddBookRequest, AddBookResponse, Book},
};

use super::{ApiJson, AuthenticatedLibrarian};

/// Add copies of a book, creating it if the ISBN is new
#[utoipa::path(
    post,
    path = "/addbook",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = AddBookRequest,
    responses(
        (status = 201, description = "Book created", body = AddBookResponse),
        (status = 200, description = "Copies added to an existing book", body = AddBookResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse)
    )
)]
pub async fn add_book(
    State(state): State<crate::AppState>,
    AuthenticatedLibrarian(_claims): AuthenticatedLibrarian,
    ApiJson(request): ApiJson<AddBookRequest>,
) -> AppResult<(StatusCode, Json<AddBookResponse>)> {
    let new_book = request.into_new_book()?;
    let (book, created) = state.services.catalog.add_book(new_book).await?;

    let (status, message) = if created {
        (StatusCode::CREATED, "Book added successfully")
    } else {
        (StatusCode::OK, "Book copies updated successfully")
    };

    Ok((
        status,
        Json(AddBookResponse {
            message: message.to_string(),
            book,
        }),
    ))
}

/// List the catalog
#[utoipa::path(
    get,
    path = "/listbooks",
    tag = "books",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All books", body = Vec<Book>)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    AuthenticatedLibrarian(_claims): AuthenticatedLibrarian,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.catalog.list_books().await?;
    Ok(Json(books))
}
