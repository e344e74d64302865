// --- File: crates/bookinglink_config/src/models.rs ---

use serde::{Deserialize, Serialize};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_PUBLIC_BASE_URL: &str = "https://yourapp.onrender.com";
pub const DEFAULT_SCHEDULER_URL: &str = "https://meetings.hubspot.com/example";
pub const DEFAULT_LINK_TTL_HOURS: i64 = 24;
pub const DEFAULT_EXPIRED_RETENTION_HOURS: i64 = 24;
/// Upper bound for hour-valued link settings: ten years.
pub const MAX_LINK_HOURS: i64 = 24 * 365 * 10;
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 3600;
pub const DEFAULT_USER_ID: &str = "default";
pub const DEFAULT_LOG_LEVEL: &str = "info";

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

// --- Scheduling Link Config ---
/// Settings for issuing, redirecting and expiring one-time scheduling links.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LinksConfig {
    /// Externally reachable address of this service. Issued links look like
    /// `<public_base_url>/redirect/<token>`.
    pub public_base_url: String,
    /// Third-party meeting scheduler every valid token is forwarded to.
    pub scheduler_url: String,
    /// Lifetime of a freshly issued link.
    pub link_ttl_hours: i64,
    /// How long an expired record stays around (and answers "expired")
    /// before the sweeper drops it.
    pub expired_retention_hours: i64,
    /// Period of the background expiry sweep. `0` disables the sweeper.
    pub sweep_interval_secs: u64,
    /// Answer 410 for links whose meeting has already been booked instead
    /// of redirecting again.
    pub reject_used_links: bool,
    /// User id assumed when `/generate` is called without `userId`.
    pub default_user_id: String,
}

fn default_user_id() -> String {
    DEFAULT_USER_ID.to_string()
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            public_base_url: DEFAULT_PUBLIC_BASE_URL.to_string(),
            scheduler_url: DEFAULT_SCHEDULER_URL.to_string(),
            link_ttl_hours: DEFAULT_LINK_TTL_HOURS,
            expired_retention_hours: DEFAULT_EXPIRED_RETENTION_HOURS,
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
            reject_used_links: false,
            default_user_id: default_user_id(),
        }
    }
}

// --- Logging Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG` when set.
    pub level: String,
    /// Log file path. Logs go to stdout when absent.
    pub file: Option<String>,
    /// `text` or `json`.
    pub format: String,
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            file: None,
            format: default_log_format(),
        }
    }
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub links: LinksConfig,
    pub logging: LoggingConfig,
}
