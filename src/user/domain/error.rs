//! Error types for user domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing user domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserDomainError {
    /// The platform identity is not a positive integer.
    #[error("invalid user identity {0}, expected a positive integer")]
    InvalidUserId(i64),

    /// The platform identity could not be parsed.
    #[error("malformed user identity '{0}'")]
    MalformedUserId(String),
}

/// Error returned while parsing user statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown user status: {0}")]
pub struct ParseUserStatusError(pub String);
