//! Session Resolver
//!
//! Turns an `Authorization` header into an [`AuthContext`]. Checks run in a
//! fixed order: header present, token decodes, user exists, token unexpired.
//! Every failure is terminal for the request; nothing is retried.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::auth::token_codec::{extract_bearer_token, TokenCodec};
use crate::principal::repository::PrincipalRepository;
use crate::shared::authorization::AuthContext;
use crate::shared::clock::Clock;
use crate::shared::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Unauthorized")]
    Missing,

    #[error("Invalid token")]
    Invalid,

    #[error("Token expired")]
    Expired,

    #[error("Cannot find user")]
    UserNotFound,
}

pub struct SessionResolver {
    codec: Arc<TokenCodec>,
    principals: Arc<dyn PrincipalRepository>,
    clock: Arc<dyn Clock>,
}

impl SessionResolver {
    pub fn new(codec: Arc<TokenCodec>, principals: Arc<dyn PrincipalRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { codec, principals, clock }
    }

    /// Resolve a raw `Authorization` header value.
    pub async fn resolve(&self, authorization: Option<&str>) -> Result<AuthContext> {
        let token = authorization
            .and_then(extract_bearer_token)
            .ok_or(AuthError::Missing)?;
        self.resolve_token(token).await
    }

    /// Resolve a bare token (without the `Bearer ` prefix).
    pub async fn resolve_token(&self, token: &str) -> Result<AuthContext> {
        let claims = self.codec.decode(token).map_err(|e| {
            debug!(error = %e, "Session token rejected");
            AuthError::Invalid
        })?;

        let principal = self
            .principals
            .find_by_id(claims.user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if claims.is_expired_at(self.clock.unix_now()) {
            debug!(user_id = claims.user_id, exp = claims.exp, "Session token expired");
            return Err(AuthError::Expired.into());
        }

        Ok(AuthContext::new(principal, claims.shadowing_user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token_codec::TokenConfig;
    use crate::principal::entity::{NewPrincipal, Role};
    use crate::principal::repository::InMemoryPrincipalRepository;
    use crate::shared::clock::ManualClock;
    use crate::shared::error::PlatformError;

    const NOW: i64 = 1_700_000_000;

    struct Fixture {
        clock: Arc<ManualClock>,
        codec: Arc<TokenCodec>,
        resolver: SessionResolver,
    }

    async fn fixture() -> Fixture {
        let clock = Arc::new(ManualClock::at(NOW));
        let codec = Arc::new(TokenCodec::new(TokenConfig::new("secret"), clock.clone()).unwrap());
        let repo = Arc::new(InMemoryPrincipalRepository::new());
        repo.create(NewPrincipal {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            role: Role::Admin,
            password_digest: String::new(),
        })
        .await
        .unwrap();

        let resolver = SessionResolver::new(codec.clone(), repo, clock.clone());
        Fixture { clock, codec, resolver }
    }

    fn auth_error(result: Result<AuthContext>) -> AuthError {
        match result {
            Err(PlatformError::Auth(e)) => e,
            other => panic!("expected auth error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_resolves_valid_token() {
        let f = fixture().await;
        let header = format!("Bearer {}", f.codec.issue(1, Some(9)).unwrap());

        let ctx = f.resolver.resolve(Some(&header)).await.unwrap();
        assert_eq!(ctx.user_id(), 1);
        assert_eq!(ctx.shadowing_user_id, Some(9));
    }

    #[tokio::test]
    async fn test_missing_header() {
        let f = fixture().await;
        assert_eq!(auth_error(f.resolver.resolve(None).await), AuthError::Missing);

        let token = f.codec.issue(1, None).unwrap();
        assert_eq!(auth_error(f.resolver.resolve(Some(&token)).await), AuthError::Missing);
    }

    #[tokio::test]
    async fn test_invalid_token() {
        let f = fixture().await;
        assert_eq!(auth_error(f.resolver.resolve(Some("Bearer nope")).await), AuthError::Invalid);
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let f = fixture().await;
        let header = format!("Bearer {}", f.codec.issue(77, None).unwrap());
        assert_eq!(auth_error(f.resolver.resolve(Some(&header)).await), AuthError::UserNotFound);
    }

    #[tokio::test]
    async fn test_expiry_boundary() {
        let f = fixture().await;
        let header = format!("Bearer {}", f.codec.issue(1, None).unwrap());

        f.clock.advance(f.codec.ttl_secs());
        assert!(f.resolver.resolve(Some(&header)).await.is_ok());

        f.clock.advance(1);
        assert_eq!(auth_error(f.resolver.resolve(Some(&header)).await), AuthError::Expired);
    }
}
