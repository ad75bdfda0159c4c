//! # Access-Control Policy
//!
//! Decides the ownership predicate injected ahead of every client filter.
//!
//! ## Invariants
//! - Non-privileged callers on an owned entity always get a predicate
//! - The predicate is derived from the caller identity only, never from
//!   request input

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::identity::CallerIdentity;
use crate::filter::FilterDescriptor;

/// Column used when an entity has no explicit rule
pub const DEFAULT_OWNER_COLUMN: &str = "user_id";

/// Supplies the ownership predicate for a caller and entity
pub trait AccessControlPolicy: Send + Sync {
    /// Returns `None` for privileged callers and ownership-less entities
    fn resolve_ownership_predicate(
        &self,
        caller: &CallerIdentity,
        entity: &str,
    ) -> Option<FilterDescriptor>;
}

/// How rows of one entity are scoped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AccessRule {
    /// Rows belong to the caller whose id is in `owner_column`
    Owned { owner_column: String },
    /// Every caller sees every row
    Shared,
}

impl AccessRule {
    pub fn owned(owner_column: impl Into<String>) -> Self {
        Self::Owned {
            owner_column: owner_column.into(),
        }
    }

    pub fn owner_column(&self) -> Option<&str> {
        match self {
            AccessRule::Owned { owner_column } => Some(owner_column),
            AccessRule::Shared => None,
        }
    }
}

impl Default for AccessRule {
    fn default() -> Self {
        Self::owned(DEFAULT_OWNER_COLUMN)
    }
}

/// Per-entity ownership rules with a fallback
#[derive(Debug, Clone, Default)]
pub struct OwnershipPolicy {
    rules: HashMap<String, AccessRule>,
    default_rule: AccessRule,
}

impl OwnershipPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule(mut self, entity: &str, rule: AccessRule) -> Self {
        self.rules.insert(entity.to_string(), rule);
        self
    }

    pub fn with_default_rule(mut self, rule: AccessRule) -> Self {
        self.default_rule = rule;
        self
    }

    pub fn rule_for(&self, entity: &str) -> &AccessRule {
        self.rules.get(entity).unwrap_or(&self.default_rule)
    }
}

impl AccessControlPolicy for OwnershipPolicy {
    fn resolve_ownership_predicate(
        &self,
        caller: &CallerIdentity,
        entity: &str,
    ) -> Option<FilterDescriptor> {
        if caller.is_privileged() {
            return None;
        }

        self.rule_for(entity)
            .owner_column()
            .map(|column| FilterDescriptor::number_equals(column, caller.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FieldType, FilterOperator};
    use serde_json::json;

    fn policy() -> OwnershipPolicy {
        OwnershipPolicy::new()
            .with_rule("users", AccessRule::owned("id"))
            .with_rule("countries", AccessRule::Shared)
    }

    #[test]
    fn test_user_gets_ownership_predicate() {
        let predicate = policy()
            .resolve_ownership_predicate(&CallerIdentity::user(7), "invoices")
            .unwrap();

        assert_eq!(predicate.field, "user_id");
        assert_eq!(predicate.field_type, FieldType::Number);
        assert_eq!(predicate.operator, FilterOperator::Equals);
        assert_eq!(predicate.value, Some(json!(7)));
    }

    #[test]
    fn test_explicit_owner_column() {
        let predicate = policy()
            .resolve_ownership_predicate(&CallerIdentity::user(3), "users")
            .unwrap();
        assert_eq!(predicate.field, "id");
    }

    #[test]
    fn test_admin_and_shared_are_unscoped() {
        let policy = policy();
        assert!(policy
            .resolve_ownership_predicate(&CallerIdentity::admin(1), "invoices")
            .is_none());
        assert!(policy
            .resolve_ownership_predicate(&CallerIdentity::user(1), "countries")
            .is_none());
    }

    #[test]
    fn test_rule_wire_format() {
        let rule: AccessRule =
            serde_json::from_value(json!({"type": "owned", "owner_column": "account_id"})).unwrap();
        assert_eq!(rule, AccessRule::owned("account_id"));

        let shared: AccessRule = serde_json::from_value(json!({"type": "shared"})).unwrap();
        assert_eq!(shared, AccessRule::Shared);
    }
}
