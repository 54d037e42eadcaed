//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, conflicts). Infrastructure concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested record was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The write conflicts with existing records (e.g. a protected reference).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A storage-level unique key was violated.
    ///
    /// Raised only by record stores; callers receive it unmodified.
    #[error("duplicate key for {constraint}: {value}")]
    Uniqueness {
        constraint: &'static str,
        value: String,
    },
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn uniqueness(constraint: &'static str, value: impl Into<String>) -> Self {
        Self::Uniqueness {
            constraint,
            value: value.into(),
        }
    }

    pub fn is_uniqueness(&self) -> bool {
        matches!(self, Self::Uniqueness { .. })
    }
}

/// Reject blank (empty or whitespace-only) text fields.
pub fn require_non_blank(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Reject text longer than `max` characters.
pub fn require_max_chars(field: &str, value: &str, max: usize) -> DomainResult<()> {
    if value.chars().count() > max {
        return Err(DomainError::validation(format!("{field} exceeds {max} characters")));
    }
    Ok(())
}
