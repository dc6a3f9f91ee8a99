//! Error types for sensorlog-store.

use std::path::PathBuf;

use sensorlog_types::ValidationError;

/// Result type for sensorlog-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sensorlog-store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database error from SQLite.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Failed to create database directory.
    #[error("Failed to create database directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The tokens handed to an insert did not form a valid reading.
    /// Nothing was written.
    #[error("Reading discarded: {0}")]
    Validation(#[from] ValidationError),

    /// Invalid timestamp.
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// CSV export error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error rejected the input rather than failing the store.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}
