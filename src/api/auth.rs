//! Librarian account endpoints

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::librarian::{
        LibrarianProfile, LoginRequest, LoginResponse, SignupRequest, UpdateProfileRequest,
    },
};

use super::{ApiJson, AuthenticatedLibrarian, MessageResponse};

/// Login with username and password
#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Missing credentials", body = crate::error::ErrorResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let token = state
        .services
        .auth
        .login(&request.username, &request.password)
        .await?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
    }))
}

/// Register a librarian account
#[utoipa::path(
    post,
    path = "/signup",
    tag = "auth",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Account created", body = MessageResponse),
        (status = 400, description = "Invalid or duplicate fields", body = crate::error::ErrorResponse)
    )
)]
pub async fn signup(
    State(state): State<crate::AppState>,
    ApiJson(request): ApiJson<SignupRequest>,
) -> AppResult<Json<MessageResponse>> {
    state.services.auth.signup(request).await?;
    Ok(Json(MessageResponse::new("User registered successfully")))
}

/// Get the authenticated librarian's profile
#[utoipa::path(
    get,
    path = "/userprofile",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current profile", body = LibrarianProfile),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "User not found")
    )
)]
pub async fn user_profile(
    State(state): State<crate::AppState>,
    AuthenticatedLibrarian(claims): AuthenticatedLibrarian,
) -> AppResult<Json<LibrarianProfile>> {
    let profile = state.services.auth.profile(claims.librarian_id).await?;
    Ok(Json(profile))
}

/// Update the authenticated librarian's profile
#[utoipa::path(
    post,
    path = "/updateprofile",
    tag = "auth",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = LibrarianProfile),
        (status = 400, description = "Invalid, duplicate or empty update", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn update_profile(
    State(state): State<crate::AppState>,
    AuthenticatedLibrarian(claims): AuthenticatedLibrarian,
    ApiJson(request): ApiJson<UpdateProfileRequest>,
) -> AppResult<Json<LibrarianProfile>> {
    let profile = state
        .services
        .auth
        .update_profile(claims.librarian_id, request)
        .await?;
    Ok(Json(profile))
}
