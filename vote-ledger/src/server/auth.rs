//! Bearer token authentication.
//!
//! Handlers that take an [`AuthenticatedUser`] only run for requests carrying
//! `Authorization: Bearer <token>` with a token the configured
//! [`IdentityVerifier`] resolves to a user id.

use std::collections::HashMap;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::errors::ApiError;
use crate::server::state::AppState;
use crate::ServerError;

/// Resolves a bearer token to the id of the user it was issued to.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// The user id for `token`, or `None` if the token is not accepted.
    async fn verify(&self, token: &str) -> Option<String>;
}

/// Verifier backed by a fixed token table.
///
/// Built from a `token=userId` list, e.g. `VOTE_LEDGER_TOKENS=s3cr3t=alice,t0k3n=bob`.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenVerifier {
    tokens: HashMap<String, String>,
}

impl StaticTokenVerifier {
    pub fn new(tokens: HashMap<String, String>) -> Self {
        Self { tokens }
    }

    /// Parse a comma-separated `token=userId` list. Blank input yields an empty table.
    pub fn parse(value: &str) -> Result<Self, ServerError> {
        let mut tokens = HashMap::new();
        for pair in crate::config::split_list(value) {
            let (token, user_id) = pair
                .split_once('=')
                .map(|(t, u)| (t.trim(), u.trim()))
                .filter(|(t, u)| !t.is_empty() && !u.is_empty())
                .ok_or_else(|| {
                    ServerError::config("VOTE_LEDGER_TOKENS entries must look like token=userId")
                })?;
            tokens.insert(token.to_string(), user_id.to_string());
        }
        Ok(Self { tokens })
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl IdentityVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Option<String> {
        self.tokens.get(token).cloned()
    }
}

/// The caller's user id, resolved from the bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub String);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .ok_or(ApiError::Unauthorized)?;

        state
            .verifier
            .verify(token)
            .await
            .map(AuthenticatedUser)
            .ok_or(ApiError::Unauthorized)
    }
}

/// Extract the token from an `Authorization` header value.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("bearer   abc "), Some("abc"));
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("abc"), None);
    }

    #[tokio::test]
    async fn test_static_verifier() {
        let verifier = StaticTokenVerifier::parse("t1=alice, t2=bob").unwrap();

        assert_eq!(verifier.len(), 2);
        assert_eq!(verifier.verify("t1").await, Some("alice".to_string()));
        assert_eq!(verifier.verify("t2").await, Some("bob".to_string()));
        assert_eq!(verifier.verify("t3").await, None);
    }

    #[test]
    fn test_static_verifier_rejects_malformed_pairs() {
        assert!(StaticTokenVerifier::parse("").unwrap().is_empty());
        assert!(StaticTokenVerifier::parse("t1").is_err());
        assert!(StaticTokenVerifier::parse("t1=").is_err());
        assert!(StaticTokenVerifier::parse("=alice").is_err());
    }
}
