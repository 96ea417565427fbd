//! Classified errors shared by every service.

use sea_orm::{DbErr, SqlErr};

// ============================================================================
// Service Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Access denied")]
    AccessDenied,

    #[error("{0}")]
    Unauthorized(String),

    #[error("Could not generate a unique slug for '{0}'")]
    SlugGeneration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn not_found(what: &str) -> Self {
        ServiceError::NotFound(format!("{} not found", what))
    }

    /// Reclassify a unique-constraint violation as a conflict.
    ///
    /// The store's unique indexes are the authority on uniqueness; any
    /// pre-insert probe is only a fast path.
    pub fn from_write(err: DbErr, conflict_message: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                ServiceError::Conflict(conflict_message.to_string())
            }
            _ => ServiceError::Database(err),
        }
    }
}
