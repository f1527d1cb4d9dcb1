//! Principal Repository
//!
//! Storage contract for principals plus an in-process implementation used by
//! tests and by the server when no database is configured.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::principal::entity::{NewPrincipal, Principal};
use crate::shared::error::{PlatformError, Result};

/// Row filter for `count` and `list`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PrincipalFilter {
    #[default]
    All,
    Id(i64),
}

impl PrincipalFilter {
    pub fn matches(&self, principal: &Principal) -> bool {
        match self {
            PrincipalFilter::All => true,
            PrincipalFilter::Id(id) => principal.id == *id,
        }
    }
}

#[async_trait]
pub trait PrincipalRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Principal>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Principal>>;

    async fn create(&self, principal: NewPrincipal) -> Result<Principal>;

    /// Fails with `NotFound` when no row has `id`.
    async fn update_suspended_at(&self, id: i64, value: Option<DateTime<Utc>>) -> Result<Principal>;

    async fn record_login(&self, id: i64, at: DateTime<Utc>) -> Result<()>;

    async fn count(&self, filter: PrincipalFilter) -> Result<i64>;

    /// Rows matching `filter`, ascending by id, after skipping `skip`, at most `take`.
    async fn list(&self, filter: PrincipalFilter, skip: i64, take: i64) -> Result<Vec<Principal>>;
}

/// Principals held in memory, keyed by id.
pub struct InMemoryPrincipalRepository {
    rows: RwLock<BTreeMap<i64, Principal>>,
    next_id: AtomicI64,
}

impl InMemoryPrincipalRepository {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryPrincipalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PrincipalRepository for InMemoryPrincipalRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Principal>> {
        Ok(self.rows.read().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Principal>> {
        Ok(self.rows.read().values().find(|p| p.email == email).cloned())
    }

    async fn create(&self, new: NewPrincipal) -> Result<Principal> {
        let mut rows = self.rows.write();
        if rows.values().any(|p| p.email == new.email) {
            return Err(PlatformError::duplicate("User", "email", new.email));
        }

        let principal = Principal {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            name: new.name,
            email: new.email,
            role: new.role,
            suspended_at: None,
            last_logged_at: None,
            password_digest: new.password_digest,
        };
        rows.insert(principal.id, principal.clone());
        Ok(principal)
    }

    async fn update_suspended_at(&self, id: i64, value: Option<DateTime<Utc>>) -> Result<Principal> {
        let mut rows = self.rows.write();
        let principal = rows
            .get_mut(&id)
            .ok_or_else(|| PlatformError::not_found("User", id.to_string()))?;
        match value {
            Some(at) => principal.suspend(at),
            None => principal.activate(),
        }
        Ok(principal.clone())
    }

    async fn record_login(&self, id: i64, at: DateTime<Utc>) -> Result<()> {
        let mut rows = self.rows.write();
        let principal = rows
            .get_mut(&id)
            .ok_or_else(|| PlatformError::not_found("User", id.to_string()))?;
        principal.last_logged_at = Some(at);
        Ok(())
    }

    async fn count(&self, filter: PrincipalFilter) -> Result<i64> {
        Ok(self.rows.read().values().filter(|p| filter.matches(p)).count() as i64)
    }

    async fn list(&self, filter: PrincipalFilter, skip: i64, take: i64) -> Result<Vec<Principal>> {
        let skip = usize::try_from(skip.max(0)).unwrap_or(usize::MAX);
        let take = usize::try_from(take.max(0)).unwrap_or(usize::MAX);

        // BTreeMap iterates in ascending id order
        Ok(self
            .rows
            .read()
            .values()
            .filter(|p| filter.matches(p))
            .skip(skip)
            .take(take)
            .cloned()
            .collect())
    }
}
