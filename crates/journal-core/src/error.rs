//! Domain-level error types.

use thiserror::Error;

use crate::ports::AuthError;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: i32 },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A unique column rejected the write. Carries the field name.
    #[error("Duplicate {0}")]
    Duplicate(&'static str),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error(transparent)]
    Repository(#[from] RepoError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    /// A unique index rejected the write.
    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Foreign key violation: {0}")]
    ForeignKey(String),
}

impl From<AuthError> for DomainError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::HashingError(msg) => DomainError::Internal(msg),
            _ => DomainError::Unauthorized,
        }
    }
}
