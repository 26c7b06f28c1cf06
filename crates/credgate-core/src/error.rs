//! Error types for credgate core.

use thiserror::Error;

/// Errors raised at the data-model boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("identifier must not be empty")]
    EmptyId,

    #[error("unknown {kind} role: {name}")]
    UnknownRole { kind: &'static str, name: String },

    #[error("unknown scope: {0}")]
    UnknownScope(String),

    #[error("unknown project type: {0}")]
    UnknownProjectType(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
