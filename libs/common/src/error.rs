//! Custom error types for the common library
//!
//! This module defines application-specific error types that can be used
//! throughout the application.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database setup operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Storage collaborator failures, classified independently of the driver
///
/// Repositories return this instead of raw `sqlx::Error` so handlers can map
/// constraint violations to responses without inspecting SQLSTATE codes.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A unique constraint rejected the write
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    /// A referenced row does not exist
    #[error("foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// The requested row does not exist
    #[error("record not found")]
    NotFound,

    /// Anything else the store reported
    #[error("storage error: {0}")]
    Other(#[source] SqlxError),
}

/// Type alias for Result with StoreError
pub type StoreResult<T> = Result<T, StoreError>;

impl From<SqlxError> for StoreError {
    fn from(err: SqlxError) -> Self {
        match err {
            SqlxError::RowNotFound => StoreError::NotFound,
            SqlxError::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::DuplicateKey(db_err.message().to_string())
            }
            SqlxError::Database(db_err) if db_err.is_foreign_key_violation() => {
                StoreError::ForeignKeyViolation(db_err.message().to_string())
            }
            other => StoreError::Other(other),
        }
    }
}
