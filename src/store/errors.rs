//! # Store Errors

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid record: {0}")]
    InvalidRecord(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }

    pub(crate) fn io(context: impl std::fmt::Display, err: std::io::Error) -> Self {
        StoreError::Io(format!("{}: {}", context, err))
    }

    pub(crate) fn serialization(context: impl std::fmt::Display, err: serde_json::Error) -> Self {
        StoreError::Serialization(format!("{}: {}", context, err))
    }

    pub(crate) fn lock_poisoned() -> Self {
        StoreError::Internal("lock poisoned".into())
    }
}
