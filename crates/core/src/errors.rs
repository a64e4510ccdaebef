//! Core error types for the Indkøb application.
//!
//! These errors are storage-agnostic. Storage implementations map their own
//! failures into `Error::Repository`, `Error::NotFound` or
//! `Error::ConstraintViolation`.

use chrono::ParseError as ChronoParseError;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the grocery domain.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn constraint(message: impl Into<String>) -> Self {
        Self::ConstraintViolation(message.into())
    }
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Field '{field}' must be {max} characters or less")]
    TooLong { field: &'static str, max: usize },

    #[error("Failed to parse date: {0}")]
    DateParse(#[from] ChronoParseError),
}

/// Trims an optional text field and turns blank values into `None`.
pub(crate) fn normalize_optional(
    value: Option<String>,
    field: &'static str,
    max: usize,
) -> std::result::Result<Option<String>, ValidationError> {
    let Some(raw) = value else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(Some(trimmed.to_string()))
}

/// Trims a required text field, rejecting blank or oversized values.
pub(crate) fn normalize_required(
    value: &str,
    field: &'static str,
    max: usize,
) -> std::result::Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field.to_string()));
    }
    if trimmed.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_string())
}
