// --- File: crates/bookinglink_links/src/models.rs ---

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::{IntoParams, ToSchema};

/// Webhook event name the scheduler sends once a meeting has been booked.
pub const MEETING_CREATED_EVENT: &str = "meetings.created";

/// Query parameter carrying the token to the scheduler and back in webhooks.
pub const CUSTOM_TOKEN_PARAM: &str = "custom_token";

/// One issued scheduling link.
///
/// A record is active while it is unused and unexpired. Expired and used
/// records are never served again by `get_or_create`; a new record replaces
/// them as the user's current link.
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// Random opaque token, the exact lookup key.
    pub token: String,
    pub user_id: String,
    /// Shareable URL, `<public_base_url>/redirect/<token>`.
    pub unique_url: String,
    /// Third-party scheduler the token redirects to.
    pub scheduler_target: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Set once a booking webhook arrives for the token.
    pub used: bool,
}

impl LinkRecord {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.used && !self.is_expired(now)
    }
}

/// Whether `get_or_create` handed out a fresh link or the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkIssue {
    Created,
    Existing,
}

impl LinkIssue {
    /// The wording used in the `/generate` response body.
    pub fn label(self) -> &'static str {
        match self {
            LinkIssue::Created => "new",
            LinkIssue::Existing => "existing",
        }
    }
}

/// Query string of `GET /generate`.
#[cfg_attr(feature = "openapi", derive(IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateQuery {
    /// External user identifier. Falls back to the configured default user.
    #[serde(rename = "userId")]
    #[cfg_attr(feature = "openapi", param(example = "alice"))]
    pub user_id: Option<String>,
}

/// Booking notification posted by the scheduler.
///
/// Every field is optional: malformed notifications are accepted and ignored.
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WebhookEvent {
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub properties: Option<WebhookProperties>,
}

#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WebhookProperties {
    #[serde(default)]
    pub custom_token: Option<String>,
}

impl WebhookEvent {
    /// Token of a "meeting booked" event, `None` for any other event.
    pub fn booked_token(&self) -> Option<&str> {
        if self.event.as_deref() != Some(MEETING_CREATED_EVENT) {
            return None;
        }
        self.properties
            .as_ref()
            .and_then(|p| p.custom_token.as_deref())
            .filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(now: DateTime<Utc>) -> LinkRecord {
        LinkRecord {
            token: "abc123".to_string(),
            user_id: "alice".to_string(),
            unique_url: "https://host/redirect/abc123".to_string(),
            scheduler_target: "https://meetings.example.com/team".to_string(),
            created_at: now,
            expires_at: now + Duration::hours(24),
            used: false,
        }
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let now = Utc::now();
        let link = record(now);
        assert!(link.is_active(link.expires_at));
        assert!(!link.is_expired(link.expires_at));
        assert!(link.is_expired(link.expires_at + Duration::milliseconds(1)));
    }

    #[test]
    fn test_used_link_is_not_active() {
        let now = Utc::now();
        let mut link = record(now);
        link.used = true;
        assert!(!link.is_active(now));
        assert!(!link.is_expired(now));
    }

    #[test]
    fn test_booked_token_requires_meeting_created() {
        let booked: WebhookEvent = serde_json::from_str(
            r#"{"event":"meetings.created","properties":{"custom_token":"abc123"}}"#,
        )
        .unwrap();
        assert_eq!(booked.booked_token(), Some("abc123"));

        let other: WebhookEvent = serde_json::from_str(
            r#"{"event":"meetings.cancelled","properties":{"custom_token":"abc123"}}"#,
        )
        .unwrap();
        assert_eq!(other.booked_token(), None);

        let no_props: WebhookEvent =
            serde_json::from_str(r#"{"event":"meetings.created"}"#).unwrap();
        assert_eq!(no_props.booked_token(), None);
    }
}
