//! Caller identity

use std::fmt;

use serde::{Deserialize, Serialize};

/// Caller role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Sees every row
    Admin,
    #[default]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated caller of one request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
    pub id: i64,
    pub role: Role,
}

impl CallerIdentity {
    pub fn new(id: i64, role: Role) -> Self {
        Self { id, role }
    }

    /// A non-privileged caller
    pub fn user(id: i64) -> Self {
        Self::new(id, Role::User)
    }

    pub fn admin(id: i64) -> Self {
        Self::new(id, Role::Admin)
    }

    /// Privileged callers are exempt from ownership scoping
    pub fn is_privileged(&self) -> bool {
        self.role == Role::Admin
    }
}
