//! Error types for the benchmark harness.

use std::io;
use std::path::PathBuf;

use graphbench_storage::StorageError;
use thiserror::Error;

/// Errors that abort a benchmark run.
#[derive(Debug, Error)]
pub enum BenchError {
    /// A filesystem entry could not be read, created or removed.
    #[error("failed to {action} {}: {source}", .path.display())]
    Filesystem {
        /// What was being attempted (`delete`, `create`, `read`).
        action: &'static str,
        /// The exact entry that failed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The storage back end failed outside the write loop (open, index
    /// declaration, shutdown, delete).
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// A write inside the workload loop failed.
    #[error("{operation} failed at index {index}: {source}")]
    Write {
        /// The storage operation (`create-vertex`, `set-property`, `commit`).
        operation: &'static str,
        /// The loop index being written.
        index: u64,
        /// The underlying storage error.
        #[source]
        source: StorageError,
    },

    /// The back end lacks a capability the workload requires.
    #[error("{backend} does not support {capability}")]
    Unsupported {
        /// Back end name.
        backend: String,
        /// The missing capability.
        capability: &'static str,
    },

    /// The workload specification is unusable.
    #[error("invalid workload: {0}")]
    InvalidSpec(String),

    /// Progress output could not be written.
    #[error("failed to write output: {0}")]
    Output(#[source] io::Error),
}

impl BenchError {
    pub(crate) fn fs(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Filesystem { action, path: path.into(), source }
    }

    pub(crate) fn write(operation: &'static str, index: u64) -> impl FnOnce(StorageError) -> Self {
        move |source| Self::Write { operation, index, source }
    }
}

/// Result type for harness operations.
pub type BenchResult<T> = Result<T, BenchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filesystem_error_names_path() {
        let err = BenchError::fs(
            "delete",
            "/tmp/graphbench/locked.bin",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "failed to delete /tmp/graphbench/locked.bin: denied");
    }

    #[test]
    fn write_error_names_operation_and_index() {
        let err = BenchError::write("create-vertex", 17)(StorageError::Closed);
        assert_eq!(err.to_string(), "create-vertex failed at index 17: storage has been shut down");
    }
}
