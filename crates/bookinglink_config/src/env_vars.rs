//! Environment variable naming for the booking link service.
//!
//! Every configuration path can be overridden by an environment variable made
//! of the prefix, a double underscore and the upper-cased path segments, e.g.
//! `links.scheduler_url` becomes `BOOKINGLINK__LINKS__SCHEDULER_URL`.

use std::env;

/// The default prefix for configuration environment variables
pub const DEFAULT_PREFIX: &str = "BOOKINGLINK";

/// The separator for configuration environment variables
pub const CONFIG_SEPARATOR: &str = "__";

/// Selects the environment-specific config file (`config/<RUN_ENV>`).
pub const DEFAULT_RUN_ENV: &str = "debug";

/// Get the prefix for configuration environment variables
pub fn get_config_prefix() -> String {
    env::var("PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string())
}

/// Get the name of the active run environment.
pub fn get_run_env() -> String {
    env::var("RUN_ENV").unwrap_or_else(|_| DEFAULT_RUN_ENV.to_string())
}

/// Convert a configuration path to an environment variable name
///
/// # Arguments
///
/// * `prefix` - The variable prefix (usually [`get_config_prefix`])
/// * `path` - The configuration path (e.g., "server.host")
///
/// # Returns
///
/// The environment variable name (e.g., "BOOKINGLINK__SERVER__HOST")
pub fn config_path_to_env_var(prefix: &str, path: &str) -> String {
    let path = path.replace('.', CONFIG_SEPARATOR);
    format!("{}{}{}", prefix, CONFIG_SEPARATOR, path).to_uppercase()
}
