// src/error.rs

//! Crate-wide error type for persistence, I/O and configuration failures
//!
//! Recipe-level failures (validation, missing records, uploads) live in
//! [`crate::recipe::RecipeError`]; this type covers everything underneath.

use thiserror::Error;

/// Errors raised by the database layer, stores and configuration loading
#[derive(Error, Debug)]
pub enum Error {
    /// SQLite error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Failed to initialize the database or a store
    #[error("Initialization error: {0}")]
    InitError(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Background task failed to complete
    #[error("Task join error: {0}")]
    TaskJoin(String),

    /// Stored row is malformed
    #[error("Corrupt record: {0}")]
    CorruptRecord(String),
}

/// Result alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::TaskJoin(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InitError("no such directory".to_string());
        assert_eq!(err.to_string(), "Initialization error: no such directory");
    }

    #[test]
    fn test_from_rusqlite() {
        let err: Error = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, Error::Database(_)));
    }
}
