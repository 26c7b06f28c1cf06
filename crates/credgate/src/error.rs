//! Error types for access resolution.

use credgate_store::StoreError;
use thiserror::Error;

/// Errors that can occur while resolving access.
///
/// Not finding a credential, or not being allowed to see it, is never an
/// error: both come back as `Ok(None)`.
#[derive(Debug, Error)]
pub enum FinderError {
    /// The store could not answer the lookup.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for finder operations.
pub type Result<T> = std::result::Result<T, FinderError>;
