//! Unified query errors
//!
//! Wraps the subsystem errors a list call can produce and classifies them
//! for callers: client rejection, cancellation, or server fault.

use std::fmt;

use thiserror::Error;

use crate::executor::ExecutorError;
use crate::planner::PlannerError;
use crate::schema::SchemaError;
use crate::storage::StorageError;

/// Result type for engine operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Severity levels for query errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Client request rejected before execution
    Reject,
    /// Operation failed, server healthy
    Error,
    /// Deployment bug; never retried
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Any failure of a list call
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Planner(#[from] PlannerError),

    #[error(transparent)]
    Executor(#[from] ExecutorError),
}

impl QueryError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::Schema(err) => err.code(),
            QueryError::Planner(err) => err.code(),
            QueryError::Executor(err) => err.code(),
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            QueryError::Schema(err) if err.is_fatal() => Severity::Fatal,
            QueryError::Schema(_) => Severity::Error,
            QueryError::Planner(err) if err.is_client_error() => Severity::Reject,
            QueryError::Planner(_) => Severity::Fatal,
            QueryError::Executor(ExecutorError::Storage(StorageError::UnknownEntity(_))) => {
                Severity::Fatal
            }
            QueryError::Executor(_) => Severity::Error,
        }
    }

    /// Caused by the request itself
    pub fn is_client_error(&self) -> bool {
        self.severity() == Severity::Reject
    }

    pub fn is_canceled(&self) -> bool {
        matches!(self, QueryError::Executor(err) if err.is_canceled())
    }
}
