// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Input validation for member fields.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

const MAX_LOGIN_ID_LENGTH: usize = 50;
const MAX_NAME_LENGTH: usize = 100;
const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321 SMTP limit

// Regex patterns for validation
static LOGIN_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]+$").unwrap());
static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());

/// Possible validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid login ID: {0}")]
    InvalidLoginId(String),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Invalid email: {0}")]
    InvalidEmail(String),
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate a login ID
pub fn validate_login_id(login_id: &str) -> ValidationResult<&str> {
    if login_id.trim().is_empty() {
        return Err(ValidationError::InvalidLoginId(
            "Login ID must not be empty".to_string(),
        ));
    }

    if login_id.len() > MAX_LOGIN_ID_LENGTH {
        return Err(ValidationError::InvalidLoginId(format!(
            "Login ID cannot exceed {MAX_LOGIN_ID_LENGTH} characters"
        )));
    }

    // Login IDs double as file names in the member store
    if !LOGIN_ID_REGEX.is_match(login_id) {
        return Err(ValidationError::InvalidLoginId(
            "Login ID must contain only letters and digits".to_string(),
        ));
    }

    Ok(login_id)
}

/// Validate a member name
pub fn validate_name(name: &str) -> ValidationResult<&str> {
    if name.trim().is_empty() {
        return Err(ValidationError::InvalidName(
            "Name must not be empty".to_string(),
        ));
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::InvalidName(format!(
            "Name cannot exceed {MAX_NAME_LENGTH} characters"
        )));
    }

    Ok(name)
}

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
