//! Loan management endpoints

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::loan::{LendBookRequest, LendBookResponse, LoanDetails, ReturnBookRequest, ReturnBookResponse},
};

use super::{ApiJson, AuthenticatedLibrarian};

/// Lend a book to a student
#[utoipa::path(
    post,
    path = "/lendbook",
    tag = "loans",
    security(("bearer_auth" = [])),
    request_body = LendBookRequest,
    responses(
        (status = 200, description = "Book lent", body = LendBookResponse),
        (status = 400, description = "Missing or invalid fields", body = crate::error::ErrorResponse),
        (status = 404, description = "Book, copy or student not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn lend_book(
    State(state): State<crate::AppState>,
    AuthenticatedLibrarian(claims): AuthenticatedLibrarian,
    ApiJson(request): ApiJson<LendBookRequest>,
) -> AppResult<Json<LendBookResponse>> {
    let loan = request.into_new_loan()?;
    let loan = state.services.loans.lend(loan).await?;

    tracing::debug!(librarian_id = claims.librarian_id, loan_id = loan.id, "Lend recorded");

    Ok(Json(LendBookResponse {
        message: "Book lent successfully".to_string(),
        loan,
    }))
}

/// Return a lent book
#[utoipa::path(
    post,
    path = "/returnbook",
    tag = "loans",
    security(("bearer_auth" = [])),
    request_body = ReturnBookRequest,
    responses(
        (status = 200, description = "Book returned", body = ReturnBookResponse),
        (status = 400, description = "Missing fields", body = crate::error::ErrorResponse),
        (status = 404, description = "No active loan for this book and student", body = crate::error::ErrorResponse)
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    AuthenticatedLibrarian(_claims): AuthenticatedLibrarian,
    ApiJson(request): ApiJson<ReturnBookRequest>,
) -> AppResult<Json<ReturnBookResponse>> {
    let (isbn, email) = request.keys()?;
    let actual_return_date = state.services.loans.return_book(isbn, email).await?;

    Ok(Json(ReturnBookResponse {
        message: "Book returned successfully".to_string(),
        actual_return_date,
    }))
}

/// List all loans with their derived status
#[utoipa::path(
    get,
    path = "/viewlentbooks",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All loans", body = Vec<LoanDetails>)
    )
)]
pub async fn view_lent_books(
    State(state): State<crate::AppState>,
    AuthenticatedLibrarian(_claims): AuthenticatedLibrarian,
) -> AppResult<Json<Vec<LoanDetails>>> {
    let loans = state.services.loans.list_loans().await?;
    Ok(Json(loans))
}
