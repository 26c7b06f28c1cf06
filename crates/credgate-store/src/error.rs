//! Error types for the store module.

use credgate_core::CoreError;
use thiserror::Error;

/// Errors that can occur during store operations.
///
/// Every variant is an infrastructure failure. "No matching record" is never
/// an error; lookups report it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The backing store could not be reached (poisoned lock, failed worker).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Stored data violates the data model.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Stored text could not be parsed into a model type.
    #[error("model error: {0}")]
    Core(#[from] CoreError),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
