//! # Caller identity and access control
//!
//! - [`CallerIdentity`]: who is asking, and whether they are privileged
//! - [`AccessControlPolicy`]: which ownership predicate applies to them
//! - [`TokenVerifier`]: bearer-token verification at the HTTP edge

mod errors;
mod identity;
mod policy;
mod token;

pub use errors::{AuthError, AuthResult};
pub use identity::{CallerIdentity, Role};
pub use policy::{AccessControlPolicy, AccessRule, OwnershipPolicy, DEFAULT_OWNER_COLUMN};
pub use token::{TokenClaims, TokenVerifier};
