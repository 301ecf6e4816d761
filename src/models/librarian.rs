//! Librarian account model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::fields::{validate_password, EMAIL_RE, NAME_RE, USERNAME_RE};

/// Librarian account from database
#[derive(Debug, Clone, FromRow)]
pub struct Librarian {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    /// Hashed password (argon2)
    pub password_hash: String,
}

/// Public view of a librarian account
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LibrarianProfile {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
}

impl From<Librarian> for LibrarianProfile {
    fn from(librarian: Librarian) -> Self {
        Self {
            first_name: librarian.first_name,
            last_name: librarian.last_name,
            username: librarian.username,
            email: librarian.email,
        }
    }
}

/// Signup request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(default)]
    #[validate(regex(path = *NAME_RE, message = "First and last names must contain only letters."))]
    pub first_name: String,
    #[serde(default)]
    #[validate(regex(path = *NAME_RE, message = "First and last names must contain only letters."))]
    pub last_name: String,
    #[serde(default)]
    #[validate(regex(path = *USERNAME_RE, message = "Username should not include periods."))]
    pub username: String,
    #[serde(default)]
    #[validate(regex(
        path = *EMAIL_RE,
        message = "Please use a valid email address with one of the following domains: gmail.com, yahoo.com, outlook.com, hotmail.com"
    ))]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "validate_password"))]
    pub password: String,
}

/// Update own profile request; absent fields are left untouched
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl UpdateProfileRequest {
    /// Keep only the supplied fields that satisfy their rule; blank or
    /// malformed values count as "not supplied".
    pub fn normalized(self) -> Self {
        fn keep(value: Option<String>, valid: impl Fn(&str) -> bool) -> Option<String> {
            value.filter(|v| !v.trim().is_empty() && valid(v))
        }
        Self {
            first_name: keep(self.first_name, |v| NAME_RE.is_match(v)),
            last_name: keep(self.last_name, |v| NAME_RE.is_match(v)),
            username: keep(self.username, |v| USERNAME_RE.is_match(v)),
            email: keep(self.email, |v| EMAIL_RE.is_match(v)),
            password: keep(self.password, |v| validate_password(v).is_ok()),
        }
    }
}

/// Librarian to be inserted
#[derive(Debug, Clone)]
pub struct NewLibrarian {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Partial replacement of librarian fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LibrarianChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

impl LibrarianChanges {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    /// Bearer token to send in the `Authorization` header
    pub token: String,
}

/// JWT claims for authenticated librarians
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibrarianClaims {
    /// Librarian id
    pub sub: String,
    pub librarian_id: i32,
    pub exp: i64,
    pub iat: i64,
}

impl LibrarianClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse and verify a JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}
