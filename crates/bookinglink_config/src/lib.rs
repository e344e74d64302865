use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

pub mod env_vars;
pub mod models;

pub use models::*;

/// Where configuration is read from.
///
/// `load_config` fills this from the process environment; tests build it
/// directly so they never touch global state.
#[derive(Debug, Clone)]
pub struct ConfigSources {
    /// Directory holding `default.*` and `<run_env>.*` files.
    pub config_dir: PathBuf,
    pub run_env: String,
    /// Prefix of overriding environment variables, e.g. `BOOKINGLINK`.
    pub env_prefix: String,
}

impl ConfigSources {
    pub fn from_env() -> Self {
        let config_dir = env::var("CONFIG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config"));
        Self {
            config_dir,
            run_env: env_vars::get_run_env(),
            env_prefix: env_vars::get_config_prefix(),
        }
    }
}

/// Loads the application configuration from the process environment.
///
/// Layers, lowest priority first: built-in defaults, `config/default.*`,
/// `config/<RUN_ENV>.*`, then `BOOKINGLINK__*` environment variables.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();
    load_config_from(&ConfigSources::from_env())
}

/// Loads and validates the configuration from explicit sources.
pub fn load_config_from(sources: &ConfigSources) -> Result<AppConfig, ConfigError> {
    let default_path = sources.config_dir.join("default");
    let env_path = sources.config_dir.join(&sources.run_env);

    debug!(
        default_path = %default_path.display(),
        env_path = %env_path.display(),
        prefix = %sources.env_prefix,
        "loading configuration"
    );

    let builder = Config::builder()
        .add_source(File::with_name(path_str(&default_path)?).required(false))
        .add_source(File::with_name(path_str(&env_path)?).required(false))
        .add_source(
            Environment::with_prefix(&sources.env_prefix)
                .separator(env_vars::CONFIG_SEPARATOR)
                .try_parsing(true),
        );

    let config: AppConfig = builder.build()?.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

fn path_str(path: &Path) -> Result<&str, ConfigError> {
    path.to_str()
        .ok_or_else(|| ConfigError::Message(format!("non UTF-8 config path: {}", path.display())))
}

impl AppConfig {
    /// Rejects settings the link service cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let prefix = env_vars::get_config_prefix();
        let invalid = |path: &str, reason: &str| {
            ConfigError::Message(format!(
                "{path} {reason} (set it in config/ or via {})",
                env_vars::config_path_to_env_var(&prefix, path)
            ))
        };

        if self.links.public_base_url.trim().is_empty() {
            return Err(invalid("links.public_base_url", "must not be empty"));
        }
        if self.links.scheduler_url.trim().is_empty() {
            return Err(invalid("links.scheduler_url", "must not be empty"));
        }
        let too_long = format!("must not exceed {} hours", MAX_LINK_HOURS);
        if self.links.link_ttl_hours <= 0 {
            return Err(invalid("links.link_ttl_hours", "must be positive"));
        }
        if self.links.link_ttl_hours > MAX_LINK_HOURS {
            return Err(invalid("links.link_ttl_hours", too_long.as_str()));
        }
        if self.links.expired_retention_hours < 0 {
            return Err(invalid("links.expired_retention_hours", "must not be negative"));
        }
        if self.links.expired_retention_hours > MAX_LINK_HOURS {
            return Err(invalid("links.expired_retention_hours", too_long.as_str()));
        }
        if self.links.default_user_id.is_empty() {
            return Err(invalid("links.default_user_id", "must not be empty"));
        }
        Ok(())
    }
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables.
///
/// The file is taken from `DOTENV_OVERRIDE`, else `.env`. Loading happens
/// once per process; a missing file is not an error. Returns the path that
/// was used.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path = env::var("DOTENV_OVERRIDE").unwrap_or_else(|_| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn sources_in(dir: PathBuf) -> ConfigSources {
        ConfigSources {
            config_dir: dir,
            run_env: "test".to_string(),
            env_prefix: "BOOKINGLINK_CONFIG_TEST_UNUSED".to_string(),
        }
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!(
            "bookinglink-config-{}-{}",
            name,
            std::process::id()
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_defaults_without_files() {
        let sources = sources_in(PathBuf::from("/nonexistent/bookinglink"));
        let config = load_config_from(&sources).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.links.link_ttl_hours, 24);
        assert_eq!(config.links.default_user_id, "default");
        assert!(!config.links.reject_used_links);
    }

    #[test]
    fn test_run_env_file_overrides_default_file() {
        let dir = scratch_dir("layering");
        fs::write(
            dir.join("default.toml"),
            "[links]\nscheduler_url = \"https://meetings.example.com/team\"\nlink_ttl_hours = 12\n",
        )
        .unwrap();
        fs::write(
            dir.join("test.toml"),
            "[links]\nlink_ttl_hours = 2\n[server]\nport = 8080\n",
        )
        .unwrap();

        let config = load_config_from(&sources_in(dir.clone())).unwrap();
        fs::remove_dir_all(&dir).ok();

        assert_eq!(config.links.scheduler_url, "https://meetings.example.com/team");
        assert_eq!(config.links.link_ttl_hours, 2);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.links.public_base_url, DEFAULT_PUBLIC_BASE_URL);
    }

    #[test]
    fn test_zero_ttl_is_rejected() {
        let dir = scratch_dir("zero-ttl");
        fs::write(dir.join("default.toml"), "[links]\nlink_ttl_hours = 0\n").unwrap();

        let result = load_config_from(&sources_in(dir.clone()));
        fs::remove_dir_all(&dir).ok();

        let err = result.unwrap_err().to_string();
        assert!(err.contains("links.link_ttl_hours"), "unexpected error: {err}");
    }

    #[test]
    fn test_hours_beyond_ten_years_are_rejected() {
        let mut config = AppConfig::default();
        config.links.link_ttl_hours = MAX_LINK_HOURS;
        config.links.expired_retention_hours = MAX_LINK_HOURS;
        assert!(config.validate().is_ok());

        config.links.link_ttl_hours = 3_000_000_000;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("links.link_ttl_hours"), "unexpected error: {err}");

        config.links.link_ttl_hours = DEFAULT_LINK_TTL_HOURS;
        config.links.expired_retention_hours = MAX_LINK_HOURS + 1;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("links.expired_retention_hours"), "unexpected error: {err}");
    }

    #[test]
    fn test_empty_scheduler_url_is_rejected() {
        let mut config = AppConfig::default();
        config.links.scheduler_url = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
