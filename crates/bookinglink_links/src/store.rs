//! Storage seam for link records.
//!
//! The registry only talks to [`LinkStore`], so the in-memory map can be
//! swapped for a durable backend. Every method that reads and then writes is
//! a single atomic step of the store; callers never hold a lock themselves.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::LinkError;
use crate::models::LinkRecord;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Result of [`LinkStore::issue`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueOutcome {
    /// The user already had an active link; the candidate was discarded.
    Existing(LinkRecord),
    /// The candidate was stored and is now the user's current link.
    Created(LinkRecord),
    /// Another record already owns the candidate's token. Nothing was stored.
    TokenTaken,
}

/// Persistence operations of the link registry.
pub trait LinkStore: Send + Sync {
    /// Returns the user's active link, or stores `candidate` as the user's
    /// current link. Check and insert happen atomically.
    fn issue(
        &self,
        candidate: LinkRecord,
        now: DateTime<Utc>,
    ) -> BoxFuture<'_, IssueOutcome, LinkError>;

    /// Exact token lookup.
    fn find_by_token(&self, token: &str) -> BoxFuture<'_, Option<LinkRecord>, LinkError>;

    /// The record `issue` last stored for the user, active or not.
    fn current_for_user(&self, user_id: &str) -> BoxFuture<'_, Option<LinkRecord>, LinkError>;

    /// Sets `used` on the record owning `token` and returns it. `None` when
    /// no record has the token.
    fn mark_used(&self, token: &str) -> BoxFuture<'_, Option<LinkRecord>, LinkError>;

    /// Deletes every record that expired before `cutoff`. Returns how many
    /// were removed.
    fn purge_expired_before(&self, cutoff: DateTime<Utc>) -> BoxFuture<'_, usize, LinkError>;

    /// Number of stored records.
    fn count(&self) -> BoxFuture<'_, usize, LinkError>;
}

#[derive(Debug, Default)]
struct Tables {
    /// token -> record, superseded records included
    records: HashMap<String, LinkRecord>,
    /// user id -> token of the user's current record
    current: HashMap<String, String>,
}

/// Process-local [`LinkStore`]. Records are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryLinkStore {
    tables: RwLock<Tables>,
}

impl InMemoryLinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, LinkError> {
        self.tables
            .read()
            .map_err(|_| LinkError::Storage("link table lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, LinkError> {
        self.tables
            .write()
            .map_err(|_| LinkError::Storage("link table lock poisoned".to_string()))
    }

    fn issue_now(
        &self,
        candidate: LinkRecord,
        now: DateTime<Utc>,
    ) -> Result<IssueOutcome, LinkError> {
        let mut tables = self.write()?;

        let existing = tables
            .current
            .get(&candidate.user_id)
            .and_then(|token| tables.records.get(token))
            .filter(|record| record.is_active(now))
            .cloned();
        if let Some(record) = existing {
            return Ok(IssueOutcome::Existing(record));
        }

        if tables.records.contains_key(&candidate.token) {
            return Ok(IssueOutcome::TokenTaken);
        }

        tables
            .current
            .insert(candidate.user_id.clone(), candidate.token.clone());
        tables
            .records
            .insert(candidate.token.clone(), candidate.clone());
        Ok(IssueOutcome::Created(candidate))
    }

    fn mark_used_now(&self, token: &str) -> Result<Option<LinkRecord>, LinkError> {
        let mut tables = self.write()?;
        Ok(tables.records.get_mut(token).map(|record| {
            record.used = true;
            record.clone()
        }))
    }

    fn purge_now(&self, cutoff: DateTime<Utc>) -> Result<usize, LinkError> {
        let mut tables = self.write()?;
        let before = tables.records.len();
        tables.records.retain(|_, record| record.expires_at >= cutoff);
        let removed = before - tables.records.len();

        if removed > 0 {
            let Tables { records, current } = &mut *tables;
            current.retain(|_, token| records.contains_key(token));
            debug!(removed, remaining = records.len(), "purged expired links");
        }
        Ok(removed)
    }
}

impl LinkStore for InMemoryLinkStore {
    fn issue(
        &self,
        candidate: LinkRecord,
        now: DateTime<Utc>,
    ) -> BoxFuture<'_, IssueOutcome, LinkError> {
        Box::pin(std::future::ready(self.issue_now(candidate, now)))
    }

    fn find_by_token(&self, token: &str) -> BoxFuture<'_, Option<LinkRecord>, LinkError> {
        let result = self.read().map(|tables| tables.records.get(token).cloned());
        Box::pin(std::future::ready(result))
    }

    fn current_for_user(&self, user_id: &str) -> BoxFuture<'_, Option<LinkRecord>, LinkError> {
        let result = self.read().map(|tables| {
            tables
                .current
                .get(user_id)
                .and_then(|token| tables.records.get(token))
                .cloned()
        });
        Box::pin(std::future::ready(result))
    }

    fn mark_used(&self, token: &str) -> BoxFuture<'_, Option<LinkRecord>, LinkError> {
        Box::pin(std::future::ready(self.mark_used_now(token)))
    }

    fn purge_expired_before(&self, cutoff: DateTime<Utc>) -> BoxFuture<'_, usize, LinkError> {
        Box::pin(std::future::ready(self.purge_now(cutoff)))
    }

    fn count(&self) -> BoxFuture<'_, usize, LinkError> {
        let result = self.read().map(|tables| tables.records.len());
        Box::pin(std::future::ready(result))
    }
}
