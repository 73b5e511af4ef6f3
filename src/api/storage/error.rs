//! Storage error types for the promotion store backends.

use thiserror::Error;

/// Storage operation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The requested promotion does not exist
    #[error("Promotion with id '{0}' was not found")]
    NotFound(i64),
    /// The record was rejected before reaching the database
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
    /// The underlying database reported a failure
    #[error("Database error: {0}")]
    Database(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::Database(err.to_string())
    }
}
