//! Executor errors
//!
//! Error codes:
//! - RG_QUERY_CANCELED (caller canceled or statement timed out)
//! - storage codes, passed through

use thiserror::Error;

use crate::storage::StorageError;

/// Result type for execution
pub type ExecutorResult<T> = Result<T, ExecutorError>;

/// Executor errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExecutorError {
    /// The store call was aborted; no partial result exists
    #[error("Query canceled: {0}")]
    Canceled(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ExecutorError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ExecutorError::Canceled(_) => "RG_QUERY_CANCELED",
            ExecutorError::Storage(err) => err.code(),
        }
    }

    pub fn is_canceled(&self) -> bool {
        matches!(self, ExecutorError::Canceled(_))
    }

    /// Cancellation is the caller's doing but not a malformed request
    pub fn is_client_error(&self) -> bool {
        false
    }
}
