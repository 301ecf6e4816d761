//! Field rules shared by request payloads

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use validator::{ValidationError, ValidationErrors};

use crate::error::{AppError, AppResult};

/// Addresses must belong to one of the accepted mail providers
pub static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@(gmail\.com|yahoo\.com|outlook\.com|hotmail\.com)$")
        .expect("valid email pattern")
});

pub static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z]+$").expect("valid name pattern"));

pub static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^.]+$").expect("valid username pattern"));

const PASSWORD_SPECIALS: &str = "!@#$%^&*";

/// Password strength rule: at least 8 characters from letters, digits and
/// `!@#$%^&*`, including one uppercase letter, one digit and one special.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let allowed = password
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SPECIALS.contains(c));
    let strong = password.chars().count() >= 8
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c));

    if allowed && strong {
        Ok(())
    } else {
        Err(ValidationError::new("weak_password").with_message(Cow::from(
            "Password must be at least 8 characters long and include one uppercase letter, one number, and one special character.",
        )))
    }
}

/// Return the trimmed value of a required field
pub fn required<'a>(value: &'a Option<String>, field: &str) -> AppResult<&'a str> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::Validation(format!("{} is required", field))),
    }
}

/// Parse a `YYYY-MM-DD` calendar date with a four-digit year
pub fn parse_date(value: &str, field: &str) -> AppResult<NaiveDate> {
    let invalid =
        || AppError::Validation(format!("{} must be a date in YYYY-MM-DD format", field));
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| invalid())?;
    // chrono also accepts signed and five-digit years
    if !(1..=9999).contains(&date.year()) {
        return Err(invalid());
    }
    Ok(date)
}

pub fn is_allowed_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter()
                    .map(|e| match &e.message {
                        Some(msg) => msg.to_string(),
                        None => format!("{} is invalid", field),
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        messages.sort();
        AppError::Validation(messages.join(" "))
    }
}
