//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, fees, health, loans, students, MessageResponse};

/// Registers the bearer token scheme referenced by protected paths
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by POST /api/login"))
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Librarium API",
        version = "0.3.0",
        description = "Library lending and membership fee REST API"
    ),
    servers(
        (url = "/api", description = "API")
    ),
    paths(
        // Health
        health::health_check,
        // Auth
        auth::login,
        auth::signup,
        auth::user_profile,
        auth::update_profile,
        // Books
        books::add_book,
        books::list_books,
        // Students
        students::add_student,
        students::list_students,
        // Loans
        loans::lend_book,
        loans::return_book,
        loans::view_lent_books,
        // Fees
        fees::manage_fees,
        fees::list_students_with_fees,
    ),
    components(
        schemas(
            // Auth
            crate::models::librarian::LoginRequest,
            crate::models::librarian::LoginResponse,
            crate::models::librarian::SignupRequest,
            crate::models::librarian::UpdateProfileRequest,
            crate::models::librarian::LibrarianProfile,
            // Books
            crate::models::book::Book,
            crate::models::book::AddBookRequest,
            crate::models::book::AddBookResponse,
            // Students
            crate::models::student::Membership,
            crate::models::student::Student,
            crate::models::student::AddStudentRequest,
            // Loans
            crate::models::loan::LoanStatus,
            crate::models::loan::LoanDetails,
            crate::models::loan::LendBookRequest,
            crate::models::loan::LendBookResponse,
            crate::models::loan::ReturnBookRequest,
            crate::models::loan::ReturnBookResponse,
            // Fees
            crate::models::fee::FeeRecord,
            crate::models::fee::ManageFeeRequest,
            crate::models::fee::ManageFeeResponse,
            crate::models::fee::StudentWithFee,
            // Health
            health::HealthResponse,
            // Common
            MessageResponse,
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Librarian accounts and authentication"),
        (name = "books", description = "Catalog management"),
        (name = "students", description = "Student roster"),
        (name = "loans", description = "Lending and returns"),
        (name = "fees", description = "Membership fees")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
