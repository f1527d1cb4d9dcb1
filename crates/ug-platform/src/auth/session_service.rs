//! Session Service
//!
//! Credential sign-in plus the token-reissuing transitions of impersonation.

use std::sync::Arc;

use tracing::{info, warn};

use crate::auth::password_service::PasswordService;
use crate::auth::session_resolver::SessionResolver;
use crate::auth::token_codec::TokenCodec;
use crate::principal::repository::PrincipalRepository;
use crate::shared::authorization::{checks, AuthContext};
use crate::shared::clock::Clock;
use crate::shared::error::{PlatformError, Result};

pub struct SessionService {
    principals: Arc<dyn PrincipalRepository>,
    passwords: Arc<PasswordService>,
    codec: Arc<TokenCodec>,
    resolver: SessionResolver,
    clock: Arc<dyn Clock>,
}

impl SessionService {
    pub fn new(
        principals: Arc<dyn PrincipalRepository>,
        passwords: Arc<PasswordService>,
        codec: Arc<TokenCodec>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let resolver = SessionResolver::new(codec.clone(), principals.clone(), clock.clone());
        Self { principals, passwords, codec, resolver, clock }
    }

    pub fn resolver(&self) -> &SessionResolver {
        &self.resolver
    }

    /// Exchange email and password for a fresh token.
    pub async fn issue_session(&self, email: &str, password: &str) -> Result<String> {
        let Some(principal) = self.principals.find_by_email(email).await? else {
            warn!(email = %email, "Sign-in failed: unknown email");
            return Err(PlatformError::InvalidCredentials);
        };

        if !self.passwords.verify_password(password, &principal.password_digest)? {
            warn!(user_id = principal.id, "Sign-in failed: wrong password");
            return Err(PlatformError::InvalidCredentials);
        }

        self.principals.record_login(principal.id, self.clock.now()).await?;
        info!(user_id = principal.id, "Session issued");

        self.codec.issue(principal.id, None)
    }

    /// Resolve the `Authorization` header of a request.
    pub async fn authenticate(&self, authorization: Option<&str>) -> Result<AuthContext> {
        self.resolver.resolve(authorization).await
    }

    /// Admin-only. Issues a token acting as `target_user_id`, shadowed by the
    /// current acting user. The target's existence is checked when the new
    /// token is used, not here.
    pub async fn begin_impersonation(&self, ctx: &AuthContext, target_user_id: i64) -> Result<String> {
        checks::require_admin(ctx)?;
        let next = ctx.session_state().enter(target_user_id)?;

        info!(
            admin_id = ctx.user_id(),
            target_id = target_user_id,
            replaced_shadow = ?ctx.shadowing_user_id,
            "Impersonation started"
        );

        self.codec.issue(next.acting_user_id(), next.shadowing_user_id())
    }

    /// Issues a plain token for the shadowing administrator.
    pub async fn end_impersonation(&self, ctx: &AuthContext) -> Result<String> {
        let next = ctx.session_state().exit()?;

        info!(
            admin_id = next.acting_user_id(),
            impersonated_id = ctx.user_id(),
            "Impersonation ended"
        );

        self.codec.issue(next.acting_user_id(), next.shadowing_user_id())
    }
}
