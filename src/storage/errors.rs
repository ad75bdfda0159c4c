//! Storage errors
//!
//! Error codes:
//! - RG_CONFIGURATION_ERROR (entity not present in the store)
//! - RG_STORAGE_BACKEND (backend failure, surfaced as-is)
//! - RG_STORAGE_DECODE (row could not be read back as JSON)

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage errors. None of these are caused by client input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    #[error("Unknown entity: '{0}'")]
    UnknownEntity(String),

    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Failed to decode row from '{entity}': {reason}")]
    Decode { entity: String, reason: String },

    #[error("Invalid row for '{entity}': {reason}")]
    InvalidRow { entity: String, reason: String },
}

impl StorageError {
    pub fn decode(entity: impl Into<String>, reason: impl ToString) -> Self {
        Self::Decode {
            entity: entity.into(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_row(entity: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRow {
            entity: entity.into(),
            reason: reason.into(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            StorageError::UnknownEntity(_) => "RG_CONFIGURATION_ERROR",
            StorageError::Backend(_) => "RG_STORAGE_BACKEND",
            StorageError::Decode { .. } => "RG_STORAGE_DECODE",
            StorageError::InvalidRow { .. } => "RG_STORAGE_INVALID_ROW",
        }
    }

    pub fn is_client_error(&self) -> bool {
        false
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        StorageError::Backend(err.to_string())
    }
}
