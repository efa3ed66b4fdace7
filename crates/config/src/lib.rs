//! Configuration loading, validation, and management for the budget split
//! assistant.
//!
//! Loads configuration from `~/.budgetsplit/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable holding the Telegram bot token.
pub const ENV_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
/// Environment variable holding the feedback recipient's Telegram ID.
pub const ENV_ADMIN_ID: &str = "ADMIN_TELEGRAM_ID";
/// Environment variable overriding the store document path.
pub const ENV_STORE_PATH: &str = "BUDGETSPLIT_STORE_PATH";

/// The root configuration structure.
///
/// Maps directly to `~/.budgetsplit/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Telegram user ID that receives `/feedback` messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_id: Option<i64>,

    /// Telegram Bot API settings
    #[serde(default)]
    pub telegram: TelegramSettings,

    /// Category store settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Allocation settings
    #[serde(default)]
    pub allocation: AllocationConfig,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct TelegramSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_token: Option<String>,

    /// Bot API base URL (without the `/bot<token>` suffix)
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Long-polling timeout passed to `getUpdates`
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,

    /// Delay before retrying after a failed poll
    #[serde(default = "default_retry_delay")]
    pub retry_delay_secs: u64,
}

fn default_api_url() -> String {
    "https://api.telegram.org".into()
}
fn default_poll_timeout() -> u64 {
    60
}
fn default_retry_delay() -> u64 {
    3
}

impl Default for TelegramSettings {
    fn default() -> Self {
        Self {
            bot_token: None,
            api_url: default_api_url(),
            poll_timeout_secs: default_poll_timeout(),
            retry_delay_secs: default_retry_delay(),
        }
    }
}

impl std::fmt::Debug for TelegramSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramSettings")
            .field("bot_token", &redact(&self.bot_token))
            .field("api_url", &self.api_url)
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .field("retry_delay_secs", &self.retry_delay_secs)
            .finish()
    }
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

/// Which category store backend to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// JSON document on disk (default)
    #[default]
    File,
    /// Process memory only, nothing survives a restart
    Memory,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    /// Store document path (default: `~/.budgetsplit/categories.json`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationConfig {
    /// Portions are rounded to a multiple of this unit
    #[serde(default = "default_rounding_unit")]
    pub rounding_unit: i64,
}

fn default_rounding_unit() -> i64 {
    100
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            rounding_unit: default_rounding_unit(),
        }
    }
}

/// Credentials required to run the Telegram runtime.
#[derive(Clone)]
pub struct TelegramCredentials {
    pub bot_token: String,
    pub admin_id: i64,
}

impl std::fmt::Debug for TelegramCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramCredentials")
            .field("bot_token", &"[REDACTED]")
            .field("admin_id", &self.admin_id)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.budgetsplit/config.toml).
    ///
    /// Environment variables take priority over the file:
    /// - `TELEGRAM_BOT_TOKEN`
    /// - `ADMIN_TELEGRAM_ID`
    /// - `BUDGETSPLIT_STORE_PATH`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides using the given lookup.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(ENV_BOT_TOKEN).filter(|t| !t.trim().is_empty()) {
            self.telegram.bot_token = Some(token.trim().to_string());
        }

        if let Some(raw) = lookup(ENV_ADMIN_ID).filter(|v| !v.trim().is_empty()) {
            let id = raw
                .trim()
                .parse::<i64>()
                .map_err(|e| ConfigError::InvalidSetting {
                    name: ENV_ADMIN_ID.into(),
                    reason: e.to_string(),
                })?;
            self.admin_id = Some(id);
        }

        if let Some(path) = lookup(ENV_STORE_PATH).filter(|p| !p.trim().is_empty()) {
            self.store.path = Some(PathBuf::from(path));
        }

        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".budgetsplit")
    }

    /// Path of the category store document.
    pub fn store_path(&self) -> PathBuf {
        self.store
            .path
            .clone()
            .unwrap_or_else(|| Self::config_dir().join("categories.json"))
    }

    /// Credentials for the Telegram runtime. Missing values are fatal.
    pub fn require_telegram(&self) -> Result<TelegramCredentials, ConfigError> {
        let bot_token = self
            .telegram
            .bot_token
            .clone()
            .ok_or_else(|| ConfigError::Missing(ENV_BOT_TOKEN.into()))?;
        let admin_id = self
            .admin_id
            .ok_or_else(|| ConfigError::Missing(ENV_ADMIN_ID.into()))?;
        Ok(TelegramCredentials {
            bot_token,
            admin_id,
        })
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.allocation.rounding_unit < 1 {
            return Err(ConfigError::ValidationError(
                "allocation.rounding_unit must be at least 1".into(),
            ));
        }

        if self.telegram.api_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "telegram.api_url must not be empty".into(),
            ));
        }

        Ok(())
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("{0} env var required")]
    Missing(String),

    #[error("Invalid {name}: {reason}")]
    InvalidSetting { name: String, reason: String },
}
