//! API handlers for Librarium REST endpoints

pub mod auth;
pub mod books;
pub mod fees;
pub mod health;
pub mod loans;
pub mod openapi;
pub mod students;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts},
    http::request::Parts,
    routing::{get, post},
    Router,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::ToSchema;

use crate::{error::AppError, models::librarian::LibrarianClaims, AppState};

/// Extractor for the librarian authenticated by a bearer token
pub struct AuthenticatedLibrarian(pub LibrarianClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedLibrarian {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Missing or malformed header: 401
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::Authentication("Missing or invalid authorization header".to_string()))?;

        // Present but unverifiable token: 403
        let claims = state.services.auth.verify_token(bearer.token())?;

        Ok(AuthenticatedLibrarian(claims))
    }
}

/// JSON body extractor rejecting malformed bodies as validation errors
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Plain acknowledgement body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Accounts
        .route("/login", post(auth::login))
        .route("/signup", post(auth::signup))
        .route("/userprofile", get(auth::user_profile))
        .route("/updateprofile", post(auth::update_profile))
        // Loans
        .route("/lendbook", post(loans::lend_book))
        .route("/returnbook", post(loans::return_book))
        .route("/viewlentbooks", get(loans::view_lent_books))
        // Fees
        .route("/managefees", post(fees::manage_fees))
        .route("/liststudentswithfees", get(fees::list_students_with_fees))
        // Catalog
        .route("/addbook", post(books::add_book))
        .route("/listbooks", get(books::list_books))
        // Roster
        .route("/addstudent", post(students::add_student))
        .route("/liststudents", get(students::list_students))
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
