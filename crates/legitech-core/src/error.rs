//! Validation errors for core type constructors.

use thiserror::Error;

/// Rejection raised when a raw value fails the checks a core newtype
/// enforces at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The value was empty after trimming surrounding whitespace.
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    /// The value did not match the expected shape.
    #[error("{field} is malformed: {reason}")]
    Malformed { field: &'static str, reason: String },
}

impl ValidationError {
    pub fn empty(field: &'static str) -> Self {
        Self::Empty { field }
    }

    pub fn malformed(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            field,
            reason: reason.into(),
        }
    }
}
