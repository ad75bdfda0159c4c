//! # Bearer Token Verification
//!
//! Validates HS256 JWTs and turns their claims into a [`CallerIdentity`].
//! Issuing tokens is someone else's job.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use super::errors::{AuthError, AuthResult};
use super::identity::{CallerIdentity, Role};

/// Claims carried by access tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the caller's numeric id
    pub sub: String,

    #[serde(default)]
    pub role: Role,

    /// Expiration (Unix epoch seconds)
    pub exp: i64,
}

impl TokenClaims {
    pub fn identity(&self) -> AuthResult<CallerIdentity> {
        let id = self
            .sub
            .trim()
            .parse::<i64>()
            .map_err(|_| AuthError::MalformedToken)?;
        Ok(CallerIdentity::new(id, self.role))
    }
}

/// Stateless token verifier
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Validate a token and extract claims
    pub fn verify(&self, token: &str) -> AuthResult<TokenClaims> {
        decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::MalformedToken,
            })
    }

    /// Verify an `Authorization` header value of the form `Bearer <jwt>`
    pub fn verify_bearer(&self, header: Option<&str>) -> AuthResult<CallerIdentity> {
        let header = header.ok_or(AuthError::AuthenticationRequired)?;
        let token = header
            .strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::AuthenticationRequired)?;

        self.verify(token)?.identity()
    }
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret";

    fn token(sub: &str, role: Role, exp_offset: i64, secret: &str) -> String {
        let claims = TokenClaims {
            sub: sub.to_string(),
            role,
            exp: chrono::Utc::now().timestamp() + exp_offset,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    #[test]
    fn test_verify_bearer() {
        let verifier = TokenVerifier::new(SECRET);
        let header = format!("Bearer {}", token("42", Role::Admin, 600, SECRET));

        let caller = verifier.verify_bearer(Some(&header)).unwrap();
        assert_eq!(caller, CallerIdentity::admin(42));
    }

    #[test]
    fn test_missing_header() {
        let verifier = TokenVerifier::new(SECRET);
        assert_eq!(verifier.verify_bearer(None), Err(AuthError::AuthenticationRequired));
        assert_eq!(
            verifier.verify_bearer(Some("Basic abc")),
            Err(AuthError::AuthenticationRequired)
        );
    }

    #[test]
    fn test_wrong_secret() {
        let verifier = TokenVerifier::new(SECRET);
        let forged = token("42", Role::Admin, 600, "other-secret");
        assert_eq!(verifier.verify(&forged), Err(AuthError::InvalidSignature));
    }

    #[test]
    fn test_expired() {
        let verifier = TokenVerifier::new(SECRET);
        let stale = token("42", Role::User, -3600, SECRET);
        assert_eq!(verifier.verify(&stale), Err(AuthError::TokenExpired));
    }

    #[test]
    fn test_non_numeric_subject() {
        let verifier = TokenVerifier::new(SECRET);
        let header = format!("Bearer {}", token("alice", Role::User, 600, SECRET));
        assert_eq!(verifier.verify_bearer(Some(&header)), Err(AuthError::MalformedToken));
    }
}
