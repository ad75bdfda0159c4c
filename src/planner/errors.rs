//! Planner errors
//!
//! Error codes:
//! - RG_INVALID_SORT_FIELD (client)
//! - RG_LIMIT_EXCEEDED (client)
//! - RG_CONFIGURATION_ERROR (server, ownership column missing)
//! - any `FilterError` code, passed through

use thiserror::Error;

use crate::filter::FilterError;

/// Result type for planning
pub type PlannerResult<T> = Result<T, PlannerError>;

/// Planner errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlannerError {
    /// Sort requested on a column the entity does not have
    #[error("Invalid sort field: '{0}'")]
    InvalidSortField(String),

    /// Page size above the configured maximum
    #[error("Requested limit {requested} exceeds maximum of {max}")]
    LimitExceeded { requested: i64, max: u32 },

    /// The access rule names an ownership column the entity does not have
    #[error("Ownership column '{column}' does not exist on entity '{entity}'")]
    OwnershipColumnMissing { entity: String, column: String },

    #[error(transparent)]
    Filter(#[from] FilterError),
}

impl PlannerError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            PlannerError::InvalidSortField(_) => "RG_INVALID_SORT_FIELD",
            PlannerError::LimitExceeded { .. } => "RG_LIMIT_EXCEEDED",
            PlannerError::OwnershipColumnMissing { .. } => "RG_CONFIGURATION_ERROR",
            PlannerError::Filter(err) => err.code(),
        }
    }

    /// Client errors are caused by the request; the rest are deployment bugs
    pub fn is_client_error(&self) -> bool {
        !matches!(self, PlannerError::OwnershipColumnMissing { .. })
    }
}
