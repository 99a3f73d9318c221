// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Registration input validation.

use regex::Regex;
use reelsearch_common::RegisterRequest;
use std::sync::LazyLock;
use thiserror::Error;

// Common validation constants
const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 128;
const MAX_USERNAME_LENGTH: usize = 50;
const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321 SMTP limit

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());

/// Possible validation errors
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Invalid password: {0}")]
    InvalidPassword(String),
}

impl ValidationError {
    /// Request field the error is reported against
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::InvalidEmail(_) => "email",
            ValidationError::InvalidUsername(_) => "username",
            ValidationError::InvalidPassword(_) => "password",
        }
    }
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate an email address
pub fn validate_email(email: &str) -> ValidationResult<&str> {
    if email.is_empty() {
        return Err(ValidationError::InvalidEmail(
            "Email address cannot be empty".to_string(),
        ));
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::InvalidEmail(format!(
            "Email address cannot exceed {MAX_EMAIL_LENGTH} characters"
        )));
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err(ValidationError::InvalidEmail(
            "Invalid email address format".to_string(),
        ));
    }

    Ok(email)
}

/// Validate a username
pub fn validate_username(username: &str) -> ValidationResult<&str> {
    if username.trim().is_empty() {
        return Err(ValidationError::InvalidUsername(
            "Username must not be empty".to_string(),
        ));
    }

    if username.len() > MAX_USERNAME_LENGTH {
        return Err(ValidationError::InvalidUsername(format!(
            "Username must be between 1 and {MAX_USERNAME_LENGTH} characters"
        )));
    }

    Ok(username)
}

/// Validate a password
pub fn validate_password(password: &str) -> ValidationResult<&str> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::InvalidPassword(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::InvalidPassword(format!(
            "Password cannot exceed {MAX_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(password)
}

/// Validate a registration request
pub fn validate_registration(request: &RegisterRequest) -> ValidationResult<()> {
    validate_email(&request.email)?;
    validate_username(&request.username)?;
    validate_password(&request.password)?;
    Ok(())
}
