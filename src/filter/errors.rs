//! Filter compilation errors
//!
//! All of these are client errors: the request names something the schema
//! or the operator table does not allow.

use thiserror::Error;

use super::types::{FieldType, FilterOperator};

/// Result type for filter compilation
pub type FilterResult<T> = Result<T, FilterError>;

/// Filter compilation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    /// The filter references a column the entity does not have
    #[error("Invalid filter field: '{0}'")]
    InvalidFilterField(String),

    /// The (field type, operator) pair is not supported
    #[error("Unsupported operator '{operator}' for field type '{field_type}'")]
    UnsupportedOperator {
        field_type: FieldType,
        operator: FilterOperator,
    },

    /// `inRange` without an upper bound
    #[error("Range value must be provided for inRange operator on field '{0}'")]
    MissingRangeValue(String),

    /// The value cannot be read as the declared field type
    #[error("Invalid value for field '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

impl FilterError {
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            FilterError::InvalidFilterField(_) => "RG_INVALID_FILTER_FIELD",
            FilterError::UnsupportedOperator { .. } => "RG_UNSUPPORTED_OPERATOR",
            FilterError::MissingRangeValue(_) => "RG_MISSING_RANGE_VALUE",
            FilterError::InvalidValue { .. } => "RG_INVALID_VALUE",
        }
    }

    /// Every filter error is caused by the request
    pub fn is_client_error(&self) -> bool {
        true
    }
}
