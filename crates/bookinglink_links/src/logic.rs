// --- File: crates/bookinglink_links/src/logic.rs ---

use std::sync::Arc;

use bookinglink_config::LinksConfig;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use crate::error::LinkError;
use crate::models::{LinkIssue, LinkRecord, CUSTOM_TOKEN_PARAM};
use crate::store::{InMemoryLinkStore, IssueOutcome, LinkStore};
use crate::token::{TokenGenerator, UuidTokenGenerator};

/// How often `get_or_create` draws a new token after a collision.
pub const MAX_TOKEN_ATTEMPTS: u32 = 5;

/// Link lifetime and addressing, derived from [`LinksConfig`].
#[derive(Debug, Clone)]
pub struct RegistrySettings {
    pub public_base_url: String,
    pub scheduler_url: String,
    pub link_ttl: Duration,
    pub expired_retention: Duration,
    pub reject_used_links: bool,
}

/// Hours as a [`Duration`], saturating at the largest representable span.
fn saturating_hours(hours: i64) -> Duration {
    Duration::try_hours(hours).unwrap_or(Duration::MAX)
}

impl From<&LinksConfig> for RegistrySettings {
    fn from(config: &LinksConfig) -> Self {
        Self {
            public_base_url: config.public_base_url.clone(),
            scheduler_url: config.scheduler_url.clone(),
            link_ttl: saturating_hours(config.link_ttl_hours),
            expired_retention: saturating_hours(config.expired_retention_hours),
            reject_used_links: config.reject_used_links,
        }
    }
}

/// Creates, resolves, consumes and expires one-time scheduling links.
///
/// Each user id has at most one active link at a time. All state lives in
/// the [`LinkStore`]; the registry itself is immutable and cheap to share.
pub struct LinkRegistry {
    store: Arc<dyn LinkStore>,
    tokens: Arc<dyn TokenGenerator>,
    settings: RegistrySettings,
}

impl LinkRegistry {
    pub fn new(
        store: Arc<dyn LinkStore>,
        tokens: Arc<dyn TokenGenerator>,
        settings: RegistrySettings,
    ) -> Self {
        Self {
            store,
            tokens,
            settings,
        }
    }

    /// Registry backed by the in-memory store and UUID tokens.
    pub fn in_memory(config: &LinksConfig) -> Self {
        Self::new(
            Arc::new(InMemoryLinkStore::new()),
            Arc::new(UuidTokenGenerator),
            RegistrySettings::from(config),
        )
    }

    /// The shareable URL for a token.
    pub fn unique_url_for(&self, token: &str) -> String {
        format!(
            "{}/redirect/{}",
            self.settings.public_base_url.trim_end_matches('/'),
            token
        )
    }

    pub async fn get_or_create(
        &self,
        user_id: &str,
    ) -> Result<(LinkRecord, LinkIssue), LinkError> {
        self.get_or_create_at(user_id, Utc::now()).await
    }

    /// Returns the user's active link unchanged, or issues a new one valid
    /// until `now + link_ttl`. The previous record, if any, stays resolvable
    /// by its token until it is purged.
    pub async fn get_or_create_at(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<(LinkRecord, LinkIssue), LinkError> {
        let expires_at = now
            .checked_add_signed(self.settings.link_ttl)
            .ok_or(LinkError::ExpiryOutOfRange)?;

        for attempt in 1..=MAX_TOKEN_ATTEMPTS {
            let token = self.tokens.generate();
            let candidate = LinkRecord {
                unique_url: self.unique_url_for(&token),
                token,
                user_id: user_id.to_string(),
                scheduler_target: self.settings.scheduler_url.clone(),
                created_at: now,
                expires_at,
                used: false,
            };

            match self.store.issue(candidate, now).await? {
                IssueOutcome::Existing(record) => {
                    debug!(user_id, token = %record.token, "reusing active link");
                    return Ok((record, LinkIssue::Existing));
                }
                IssueOutcome::Created(record) => {
                    info!(
                        user_id,
                        token = %record.token,
                        expires_at = %record.expires_at,
                        "issued new link"
                    );
                    return Ok((record, LinkIssue::Created));
                }
                IssueOutcome::TokenTaken => {
                    warn!(user_id, attempt, "generated token already in use, retrying");
                }
            }
        }
        Err(LinkError::TokenCollision(MAX_TOKEN_ATTEMPTS))
    }

    /// Exact-match lookup of the record owning `token`.
    pub async fn find_by_token(&self, token: &str) -> Result<Option<LinkRecord>, LinkError> {
        self.store.find_by_token(token).await
    }

    /// The record most recently issued to `user_id`, whatever its state.
    pub async fn current_for_user(&self, user_id: &str) -> Result<Option<LinkRecord>, LinkError> {
        self.store.current_for_user(user_id).await
    }

    pub async fn resolve(&self, token: &str) -> Result<String, LinkError> {
        self.resolve_at(token, Utc::now()).await
    }

    /// Maps a token to the scheduler URL carrying it as `custom_token`.
    ///
    /// Used links keep redirecting unless `reject_used_links` is set.
    pub async fn resolve_at(&self, token: &str, now: DateTime<Utc>) -> Result<String, LinkError> {
        let record = self
            .store
            .find_by_token(token)
            .await?
            .ok_or(LinkError::NotFound)?;

        if record.is_expired(now) {
            return Err(LinkError::Expired);
        }
        if record.used && self.settings.reject_used_links {
            return Err(LinkError::AlreadyUsed);
        }
        Ok(scheduler_redirect_url(&record.scheduler_target, &record.token))
    }

    /// Flags the token's record as used. Unknown tokens are ignored and
    /// reported as `false`.
    pub async fn mark_used(&self, token: &str) -> Result<bool, LinkError> {
        match self.store.mark_used(token).await? {
            Some(record) => {
                info!(token, user_id = %record.user_id, "link marked as used");
                Ok(true)
            }
            None => {
                debug!(token, "mark_used for unknown token ignored");
                Ok(false)
            }
        }
    }

    pub async fn purge_expired(&self) -> Result<usize, LinkError> {
        self.purge_expired_at(Utc::now()).await
    }

    /// Drops records that expired more than `expired_retention` before `now`.
    /// A retention reaching before the earliest representable time purges
    /// nothing.
    pub async fn purge_expired_at(&self, now: DateTime<Utc>) -> Result<usize, LinkError> {
        let cutoff = now
            .checked_sub_signed(self.settings.expired_retention)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        self.store.purge_expired_before(cutoff).await
    }

    pub async fn stored_links(&self) -> Result<usize, LinkError> {
        self.store.count().await
    }
}

/// Appends `custom_token=<token>` to the scheduler URL, keeping any query
/// string the target already has.
pub fn scheduler_redirect_url(target: &str, token: &str) -> String {
    let query = serde_urlencoded::to_string([(CUSTOM_TOKEN_PARAM, token)])
        .unwrap_or_else(|_| format!("{}={}", CUSTOM_TOKEN_PARAM, token));
    let separator = if target.ends_with('?') || target.ends_with('&') {
        ""
    } else if target.contains('?') {
        "&"
    } else {
        "?"
    };
    format!("{}{}{}", target, separator, query)
}
