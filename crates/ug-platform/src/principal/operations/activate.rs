//! Activate User Use Case

use std::sync::Arc;

use tracing::info;

use crate::principal::entity::Principal;
use crate::principal::repository::PrincipalRepository;
use crate::shared::authorization::{checks, AuthContext};
use crate::shared::error::Result;

/// Clears `suspendedAt`. Administrators only.
pub struct ActivateUserUseCase {
    principals: Arc<dyn PrincipalRepository>,
}

impl ActivateUserUseCase {
    pub fn new(principals: Arc<dyn PrincipalRepository>) -> Self {
        Self { principals }
    }

    pub async fn execute(&self, user_id: i64, ctx: &AuthContext) -> Result<Principal> {
        checks::require_admin(ctx)?;

        let principal = self.principals.update_suspended_at(user_id, None).await?;

        info!(user_id, admin_id = ctx.user_id(), "User activated");
        Ok(principal)
    }
}
