//! Cursor Pager
//!
//! Turns a listing request into a bounded, ordered fetch of one row more than
//! the page size, and assembles the page from it. The extra row only signals
//! `hasNextPage`; it is never returned.

use std::sync::Arc;

use tracing::debug;

use crate::principal::entity::Principal;
use crate::principal::repository::{PrincipalFilter, PrincipalRepository};
use crate::shared::connection::Connection;
use crate::shared::cursor::decode_cursor;
use crate::shared::error::Result;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Visibility boundary for a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    AdminAll,
    SelfOnly(i64),
}

impl ListScope {
    /// Admins see everyone; anyone else sees only themselves.
    pub fn for_principal(principal: &Principal) -> Self {
        if principal.is_admin() {
            ListScope::AdminAll
        } else {
            ListScope::SelfOnly(principal.id)
        }
    }

    fn filter(&self) -> PrincipalFilter {
        match self {
            ListScope::AdminAll => PrincipalFilter::All,
            ListScope::SelfOnly(id) => PrincipalFilter::Id(*id),
        }
    }
}

pub struct PrincipalPager {
    principals: Arc<dyn PrincipalRepository>,
}

impl PrincipalPager {
    pub fn new(principals: Arc<dyn PrincipalRepository>) -> Self {
        Self { principals }
    }

    pub async fn page(
        &self,
        scope: ListScope,
        page_size: u32,
        cursor: Option<&str>,
    ) -> Result<Connection<Principal>> {
        let offset = match cursor {
            Some(cursor) => decode_cursor(cursor)?,
            None => 0,
        };
        let page_size = i64::from(page_size);

        let mut rows = self
            .principals
            .list(scope.filter(), offset, page_size + 1)
            .await?;

        let has_next_page = rows.len() as i64 > page_size;
        rows.truncate(page_size as usize);

        // total count is an admin-only signal
        let total_count = match scope {
            ListScope::AdminAll => self.principals.count(PrincipalFilter::All).await?,
            ListScope::SelfOnly(_) => 0,
        };

        debug!(?scope, offset, page_size, returned = rows.len(), has_next_page, "Paged users");

        Ok(Connection::from_slice(rows, offset, has_next_page, total_count))
    }
}
