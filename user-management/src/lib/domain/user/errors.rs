use thiserror::Error;

use crate::user::models::UserId;

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Top-level error for all user-related operations
#[derive(Debug, Clone, Error)]
pub enum UserError {
    // Validation errors
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid number of users. Must be between 1 and 1000.")]
    InvalidBatchSize(usize),

    // Domain-level errors
    #[error("User with id {0} not found")]
    NotFound(UserId),

    #[error("User with email {0} not found")]
    NotFoundByEmail(String),

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}
