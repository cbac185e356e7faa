use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the Qase API token
pub const TOKEN_ENV: &str = "QASE_API_TOKEN";

/// Environment variable holding the Qase project code
pub const PROJECT_ENV: &str = "QASE_PROJECT_CODE";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Qase API connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the v1 REST API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// API token; usually supplied through `QASE_API_TOKEN`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Project code (e.g., "DEMO"); usually supplied through `QASE_PROJECT_CODE`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_code: Option<String>,
    /// Per-request timeout in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Pause between consecutive create requests in milliseconds (default: 100)
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
    /// Retries for transient failures (default: 3)
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
}

fn default_base_url() -> String {
    "https://api.qase.io/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_request_delay_ms() -> u64 {
    100
}

fn default_max_retries() -> usize {
    3
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            project_code: None,
            timeout_secs: default_timeout_secs(),
            request_delay_ms: default_request_delay_ms(),
            max_retries: default_max_retries(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Write logs to a file instead of stderr
    #[serde(default)]
    pub to_file: bool,

    /// Directory for log files when `to_file` is set
    #[serde(default = "default_log_directory")]
    pub directory: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_directory() -> String {
    "logs".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            to_file: false,
            directory: default_log_directory(),
        }
    }
}

impl Config {
    /// Config file looked up in the working directory
    pub fn local_config_path() -> PathBuf {
        PathBuf::from("qase-bulk.toml")
    }

    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // Start with embedded defaults so the tool works without config files
        let defaults = Config::default();
        let defaults_json =
            serde_json::to_string(&defaults).context("Failed to serialize default config")?;

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            &defaults_json,
            config::FileFormat::Json,
        ));

        // Project-local config
        let local_config = Self::local_config_path();
        if local_config.exists() {
            builder = builder.add_source(config::File::from(local_config));
        }

        // User config in ~/.config/qase-bulk/ (optional global overrides)
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("qase-bulk").join("config.toml");
            if user_config.exists() {
                builder = builder.add_source(config::File::from(user_config));
            }
        }

        // Explicit config file (CLI override)
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        }

        // Nested overrides such as QASE_API__BASE_URL
        builder = builder.add_source(
            config::Environment::with_prefix("QASE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // Flat variables used by existing scripts and .env files
        builder = builder
            .set_override_option("api.token", non_empty_env(TOKEN_ENV))
            .context("Failed to apply QASE_API_TOKEN")?
            .set_override_option("api.project_code", non_empty_env(PROJECT_ENV))
            .context("Failed to apply QASE_PROJECT_CODE")?;

        let config = builder.build().context("Failed to load configuration")?;
        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Write config as TOML, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml_str =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        std::fs::write(path, toml_str).context("Failed to write config file")?;

        Ok(())
    }

    /// Get absolute path to the logs directory
    pub fn logs_path(&self) -> PathBuf {
        let path = PathBuf::from(&self.logging.directory);
        if path.is_absolute() {
            path
        } else {
            std::env::current_dir().unwrap_or_default().join(path)
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}
