//! Authorization Context
//!
//! Per-request identity derived from a session token, and the role checks
//! applied before privileged operations.

use crate::auth::impersonation::SessionState;
use crate::principal::entity::Principal;

/// The acting principal for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub principal: Principal,

    /// Administrator behind an impersonation session
    pub shadowing_user_id: Option<i64>,
}

impl AuthContext {
    pub fn new(principal: Principal, shadowing_user_id: Option<i64>) -> Self {
        Self { principal, shadowing_user_id }
    }

    pub fn user_id(&self) -> i64 {
        self.principal.id
    }

    pub fn is_admin(&self) -> bool {
        self.principal.is_admin()
    }

    pub fn session_state(&self) -> SessionState {
        SessionState::from_claims(self.principal.id, self.shadowing_user_id)
    }
}

/// Role checks for API handlers and operations.
pub mod checks {
    use super::AuthContext;
    use crate::shared::error::PlatformError;

    /// Only administrators may pass.
    pub fn require_admin(ctx: &AuthContext) -> Result<(), PlatformError> {
        if ctx.is_admin() {
            Ok(())
        } else {
            tracing::warn!(user_id = ctx.user_id(), "Admin role required");
            Err(PlatformError::unauthorized("Unauthorized"))
        }
    }
}
