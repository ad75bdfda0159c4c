//! # Auth Errors
//!
//! Every variant maps to 401 at the HTTP surface.

use thiserror::Error;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Bearer token errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No `Authorization: Bearer` header
    #[error("Authentication required")]
    AuthenticationRequired,

    /// JWT token is malformed, or its claims are unusable
    #[error("Malformed token")]
    MalformedToken,

    /// JWT token has expired
    #[error("Token expired")]
    TokenExpired,

    /// JWT signature is invalid
    #[error("Invalid token signature")]
    InvalidSignature,
}

impl AuthError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::AuthenticationRequired => "RG_AUTH_REQUIRED",
            AuthError::MalformedToken => "RG_AUTH_MALFORMED_TOKEN",
            AuthError::TokenExpired => "RG_AUTH_TOKEN_EXPIRED",
            AuthError::InvalidSignature => "RG_AUTH_INVALID_SIGNATURE",
        }
    }

    pub fn is_client_error(&self) -> bool {
        true
    }
}
