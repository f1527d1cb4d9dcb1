//! Suspend User Use Case

use std::sync::Arc;

use tracing::info;

use crate::principal::entity::Principal;
use crate::principal::repository::PrincipalRepository;
use crate::shared::authorization::{checks, AuthContext};
use crate::shared::clock::Clock;
use crate::shared::error::Result;

/// Stamps `suspendedAt` with the current time. Administrators only.
pub struct SuspendUserUseCase {
    principals: Arc<dyn PrincipalRepository>,
    clock: Arc<dyn Clock>,
}

impl SuspendUserUseCase {
    pub fn new(principals: Arc<dyn PrincipalRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { principals, clock }
    }

    pub async fn execute(&self, user_id: i64, ctx: &AuthContext) -> Result<Principal> {
        checks::require_admin(ctx)?;

        let principal = self
            .principals
            .update_suspended_at(user_id, Some(self.clock.now()))
            .await?;

        info!(user_id, admin_id = ctx.user_id(), "User suspended");
        Ok(principal)
    }
}
