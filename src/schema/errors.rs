//! Schema error types
//!
//! Error codes:
//! - RG_CONFIGURATION_ERROR (FATAL)
//! - RG_SCHEMA_INTROSPECTION_FAILED (ERROR)

use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Schema introspection errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The entity does not exist in the live schema. Never caused by client
    /// input: resource-to-entity routing is server configuration.
    #[error("Configuration error: entity '{0}' does not exist in the live schema")]
    UnknownEntity(String),

    /// The schema source could not be read
    #[error("Schema introspection failed for '{entity}': {reason}")]
    Introspection { entity: String, reason: String },
}

impl SchemaError {
    /// Create an introspection failure
    pub fn introspection(entity: impl Into<String>, reason: impl ToString) -> Self {
        Self::Introspection {
            entity: entity.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::UnknownEntity(_) => "RG_CONFIGURATION_ERROR",
            SchemaError::Introspection { .. } => "RG_SCHEMA_INTROSPECTION_FAILED",
        }
    }

    /// A fatal error points at a deployment bug and must never be retried
    pub fn is_fatal(&self) -> bool {
        matches!(self, SchemaError::UnknownEntity(_))
    }

    pub fn is_client_error(&self) -> bool {
        false
    }

    /// Returns the entity the error refers to
    pub fn entity(&self) -> &str {
        match self {
            SchemaError::UnknownEntity(entity) => entity,
            SchemaError::Introspection { entity, .. } => entity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_entity_is_fatal() {
        let err = SchemaError::UnknownEntity("ghosts".into());
        assert!(err.is_fatal());
        assert_eq!(err.code(), "RG_CONFIGURATION_ERROR");
        assert!(err.to_string().contains("ghosts"));
    }

    #[test]
    fn test_introspection_failure_not_fatal() {
        let err = SchemaError::introspection("invoices", "disk I/O error");
        assert!(!err.is_fatal());
        assert_eq!(err.entity(), "invoices");
    }
}
