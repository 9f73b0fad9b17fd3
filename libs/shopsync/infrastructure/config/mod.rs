use crate::domain::Identity;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config file: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid environment variable {0}: {1}")]
    EnvVarInvalid(String, String),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Dashboard configuration
///
/// Read once at startup; sessions never re-read it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub api: ApiConfig,
    pub push: PushConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub session: SessionConfig,
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Gateway base URL for the pull channel
    pub base_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    /// Push channel base URL; the identity is appended as a path segment
    pub url: String,
    #[serde(default = "default_reconnect_delay")]
    pub reconnect_delay_ms: u64,
    /// Keepalive ping interval; disabled when absent
    #[serde(default)]
    pub heartbeat_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Delay between order creation and the follow-up refresh
    #[serde(default = "default_order_refresh_delay")]
    pub order_refresh_delay_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            order_refresh_delay_ms: default_order_refresh_delay(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Identity the dashboard starts with
    #[serde(default = "default_identity")]
    pub identity: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            identity: default_identity(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_reconnect_delay() -> u64 {
    3000
}

fn default_order_refresh_delay() -> u64 {
    1000
}

fn default_identity() -> u64 {
    1
}

impl DashboardConfig {
    /// Load configuration from a YAML file, apply environment overrides and validate
    pub fn load(config_path: impl AsRef<Path>) -> Result<Self> {
        let yaml_content = std::fs::read_to_string(config_path)?;
        let mut config = Self::from_yaml(&yaml_content)?;

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Parse YAML without overrides or validation
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Apply `API_URL`, `WS_URL` and `USER_ID` from `lookup`
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(api_url) = lookup("API_URL") {
            info!("Overriding API URL from environment variable");
            self.api.base_url = api_url;
        }

        if let Some(ws_url) = lookup("WS_URL") {
            info!("Overriding push URL from environment variable");
            self.push.url = ws_url;
        }

        if let Some(user_id) = lookup("USER_ID") {
            info!("Overriding identity from environment variable");
            self.session.identity = user_id
                .trim()
                .parse()
                .map_err(|_| ConfigError::EnvVarInvalid("USER_ID".to_string(), user_id.clone()))?;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "api.base_url must not be empty".to_string(),
            ));
        }

        if self.push.url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "push.url must not be empty".to_string(),
            ));
        }

        if !self.push.url.starts_with("ws://") && !self.push.url.starts_with("wss://") {
            return Err(ConfigError::ValidationError(
                "push.url must start with ws:// or wss://".to_string(),
            ));
        }

        if self.push.reconnect_delay_ms == 0 {
            return Err(ConfigError::ValidationError(
                "push.reconnect_delay_ms must be greater than 0".to_string(),
            ));
        }

        if self.push.heartbeat_secs == Some(0) {
            return Err(ConfigError::ValidationError(
                "push.heartbeat_secs must be greater than 0 when set".to_string(),
            ));
        }

        if self.session.identity == 0 {
            return Err(ConfigError::ValidationError(
                "session.identity must be a positive integer".to_string(),
            ));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "log_level must be one of: {}",
                valid_levels.join(", ")
            )));
        }

        Ok(())
    }

    pub fn identity(&self) -> Result<Identity> {
        Identity::new(self.session.identity).ok_or_else(|| {
            ConfigError::ValidationError("session.identity must be a positive integer".to_string())
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.request_timeout_secs)
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.push.reconnect_delay_ms)
    }

    pub fn heartbeat_interval(&self) -> Option<Duration> {
        self.push.heartbeat_secs.map(Duration::from_secs)
    }

    pub fn order_refresh_delay(&self) -> Duration {
        Duration::from_millis(self.store.order_refresh_delay_ms)
    }

    /// Log configuration summary
    pub fn log(&self) {
        info!("Configuration loaded:");
        info!("  API base URL: {}", self.api.base_url);
        info!("  Push URL: {}", self.push.url);
        info!("  Reconnect delay: {} ms", self.push.reconnect_delay_ms);
        match self.push.heartbeat_secs {
            Some(secs) => info!("  Heartbeat: every {} s", secs),
            None => info!("  Heartbeat: disabled"),
        }
        info!("  Order refresh delay: {} ms", self.store.order_refresh_delay_ms);
        info!("  Identity: {}", self.session.identity);
        info!("  Log level: {}", self.log_level);
    }
}
