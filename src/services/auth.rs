//! Librarian authentication and account service

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use mockable::Clock;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::librarian::{
        Librarian, LibrarianChanges, LibrarianClaims, LibrarianProfile, NewLibrarian,
        SignupRequest, UpdateProfileRequest,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
    clock: Arc<dyn Clock>,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            config,
            clock,
        }
    }

    /// Register a new librarian account
    pub async fn signup(&self, request: SignupRequest) -> AppResult<LibrarianProfile> {
        request.validate()?;

        if self
            .repository
            .librarians
            .username_exists(&request.username, None)
            .await?
        {
            return Err(AppError::Conflict("Username already taken.".to_string()));
        }
        if self
            .repository
            .librarians
            .email_exists(&request.email, None)
            .await?
        {
            return Err(AppError::Conflict("Email already registered.".to_string()));
        }

        let librarian = self
            .repository
            .librarians
            .insert(&NewLibrarian {
                first_name: request.first_name,
                last_name: request.last_name,
                username: request.username,
                email: request.email,
                password_hash: self.hash_password(&request.password)?,
            })
            .await?;

        tracing::info!(librarian_id = librarian.id, username = %librarian.username, "Librarian registered");

        Ok(librarian.into())
    }

    /// Check credentials and issue a bearer token
    pub async fn login(&self, username: &str, password: &str) -> AppResult<String> {
        let librarian = self.authenticate(username, password).await?;
        self.issue_token(&librarian)
    }

    /// Authenticate by username and password
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<Librarian> {
        let invalid = || AppError::Authentication("Invalid username or password".to_string());

        if username.trim().is_empty() || password.is_empty() {
            return Err(AppError::Validation(
                "Username and password are required".to_string(),
            ));
        }

        let librarian = self
            .repository
            .librarians
            .find_by_username(username)
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(&librarian.password_hash, password)? {
            return Err(invalid());
        }

        Ok(librarian)
    }

    /// Create a signed token for the given librarian
    pub fn issue_token(&self, librarian: &Librarian) -> AppResult<String> {
        let now = self.clock.utc().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = LibrarianClaims {
            sub: librarian.id.to_string(),
            librarian_id: librarian.id,
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Verify a bearer token and return its claims
    pub fn verify_token(&self, token: &str) -> AppResult<LibrarianClaims> {
        LibrarianClaims::from_token(token, &self.config.jwt_secret)
            .map_err(|_| AppError::Authorization("Invalid or expired token".to_string()))
    }

    /// Profile of the given librarian
    pub async fn profile(&self, librarian_id: i32) -> AppResult<LibrarianProfile> {
        self.repository
            .librarians
            .find_by_id(librarian_id)
            .await?
            .map(LibrarianProfile::from)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Update the valid supplied fields of the librarian's own account.
    ///
    /// Fields failing their rule are ignored; the request is refused only
    /// when none is left.
    pub async fn update_profile(
        &self,
        librarian_id: i32,
        request: UpdateProfileRequest,
    ) -> AppResult<LibrarianProfile> {
        let request = request.normalized();

        let mut changes = LibrarianChanges {
            first_name: request.first_name,
            last_name: request.last_name,
            username: request.username,
            email: request.email,
            password_hash: None,
        };
        if let Some(password) = &request.password {
            changes.password_hash = Some(self.hash_password(password)?);
        }

        if changes.is_empty() {
            return Err(AppError::Validation("No valid fields to update".to_string()));
        }

        if let Some(username) = &changes.username {
            if self
                .repository
                .librarians
                .username_exists(username, Some(librarian_id))
                .await?
            {
                return Err(AppError::Conflict("Username already taken.".to_string()));
            }
        }
        if let Some(email) = &changes.email {
            if self
                .repository
                .librarians
                .email_exists(email, Some(librarian_id))
                .await?
            {
                return Err(AppError::Conflict("Email already registered.".to_string()));
            }
        }

        let updated = self
            .repository
            .librarians
            .update(librarian_id, &changes)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        tracing::info!(librarian_id, "Profile updated");

        Ok(updated.into())
    }

    /// Hash a password using Argon2
    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}

fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
