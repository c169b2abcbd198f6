//! Storage error types.

use graphbench_core::CoreError;
use thiserror::Error;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The store could not be opened.
    #[error("failed to open storage: {0}")]
    Open(String),

    /// A transaction could not be started or committed.
    #[error("transaction error: {0}")]
    Transaction(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A key or value could not be encoded.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// The back end does not support the requested capability.
    #[error("operation not supported: {0}")]
    Unsupported(String),

    /// A referenced element does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// An element with the requested id already exists.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The handle was used after shutdown.
    #[error("storage has been shut down")]
    Closed,

    /// The underlying engine reported an unexpected error.
    #[error("internal storage error: {0}")]
    Internal(String),
}

impl From<CoreError> for StorageError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Encoding(msg) => Self::Encoding(msg),
        }
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = StorageError::Unsupported("key index on vertex property 'int'".to_owned());
        assert_eq!(err.to_string(), "operation not supported: key index on vertex property 'int'");
        assert_eq!(StorageError::Closed.to_string(), "storage has been shut down");
    }

    #[test]
    fn from_core_error() {
        let err: StorageError = CoreError::Encoding("string too long".to_owned()).into();
        assert!(matches!(err, StorageError::Encoding(_)));
    }
}
