//! Configuration management for bangumi-score
//!
//! This module handles loading and validating configuration from environment variables,
//! TOML files, and command-line overrides. The resulting [`Config`] value is passed
//! explicitly into every component; nothing reads process-wide state after startup.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::review::ReviewKind;
use crate::utils::retry::RetryConfig;

/// Browser user agent sent with every API request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/109.0.0.0 Safari/537.36 Edg/109.0.1518.55";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote API configuration
    pub api: ApiConfig,

    /// Pagination configuration
    pub fetch: FetchConfig,

    /// Snapshot file configuration
    pub storage: StorageConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Bilibili API client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API base URL
    pub base_url: String,

    /// User agent string
    pub user_agent: String,

    /// Referer header value
    pub referer: String,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// Rate limit (requests per second)
    pub rate_limit: u32,

    /// Retry attempts for transient failures
    pub max_retries: u32,

    /// Base backoff delay in milliseconds
    pub retry_base_delay_ms: u64,

    /// Backoff ceiling in milliseconds
    pub retry_max_delay_ms: u64,
}

/// Review pagination configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Items requested per page (`ps`)
    pub page_size: u32,

    /// Upper bound on pages per review category
    pub max_pages: u32,
}

/// Snapshot storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the snapshot files
    pub data_dir: PathBuf,

    /// Short review snapshot file name
    pub short_file: String,

    /// Long review snapshot file name
    pub long_file: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(base_url) = std::env::var("BSCORE_BASE_URL") {
            config.api.base_url = base_url;
        }
        if let Ok(user_agent) = std::env::var("BSCORE_USER_AGENT") {
            config.api.user_agent = user_agent;
        }
        config.api.request_timeout_secs =
            env_parse("BSCORE_REQUEST_TIMEOUT")?.unwrap_or(config.api.request_timeout_secs);
        config.api.rate_limit = env_parse("BSCORE_RATE_LIMIT")?.unwrap_or(config.api.rate_limit);
        config.api.max_retries =
            env_parse("BSCORE_MAX_RETRIES")?.unwrap_or(config.api.max_retries);

        config.fetch.page_size = env_parse("BSCORE_PAGE_SIZE")?.unwrap_or(config.fetch.page_size);
        config.fetch.max_pages = env_parse("BSCORE_MAX_PAGES")?.unwrap_or(config.fetch.max_pages);

        if let Ok(data_dir) = std::env::var("BSCORE_DATA_DIR") {
            config.storage.data_dir = PathBuf::from(data_dir);
        }

        if let Ok(level) = std::env::var("BSCORE_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Ok(format) = std::env::var("BSCORE_LOG_FORMAT") {
            config.logging.format = format;
        }

        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            anyhow::bail!("api.base_url must not be empty");
        }

        if self.api.rate_limit == 0 {
            anyhow::bail!("api.rate_limit must be greater than 0");
        }

        if self.fetch.page_size == 0 {
            anyhow::bail!("fetch.page_size must be greater than 0; ps=0 only returns totals");
        }

        if self.fetch.max_pages == 0 {
            anyhow::bail!("fetch.max_pages must be greater than 0");
        }

        if self.storage.short_file == self.storage.long_file {
            anyhow::bail!("storage.short_file and storage.long_file must differ");
        }

        Ok(())
    }
}

impl ApiConfig {
    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Retry policy for transient failures
    #[must_use]
    pub fn retry(&self) -> RetryConfig {
        RetryConfig::with_delays(
            self.max_retries,
            self.retry_base_delay_ms,
            self.retry_max_delay_ms,
        )
    }
}

impl StorageConfig {
    /// Snapshot file for a review category
    pub fn path_for(&self, kind: ReviewKind) -> PathBuf {
        match kind {
            ReviewKind::Short => self.data_dir.join(&self.short_file),
            ReviewKind::Long => self.data_dir.join(&self.long_file),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::from("https://api.bilibili.com"),
            user_agent: String::from(DEFAULT_USER_AGENT),
            referer: String::from("https://www.bilibili.com/"),
            request_timeout_secs: 30,
            rate_limit: 5,
            max_retries: 3,
            retry_base_delay_ms: 1000,
            retry_max_delay_ms: 30_000,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            max_pages: 10_000,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            short_file: String::from("short_comments.json"),
            long_file: String::from("long_comments.json"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("Invalid value for {key}: {value}")),
        Err(_) => Ok(None),
    }
}
