//! Error types for eav-tidy

use thiserror::Error;

/// Common result type for eav-tidy operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a run.
///
/// Per-row trouble (a delete that fails, several global rows matching one
/// override) is absorbed into the run report instead; only configuration
/// problems and storage-level faults surface here.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error before any row is processed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Connectivity lost mid-run; identifies the table and operation in progress
    #[error("Storage unavailable while {context} in {table}: {source}")]
    Storage {
        table: String,
        context: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
