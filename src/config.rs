//! Client configuration
//!
//! Loads configuration from config.toml with support for:
//! - Bounty board base URL
//! - Default wallet address for claims and submissions
//! - Retry and timeout settings
//!
//! Environment variables override file values.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://bounty.owockibot.xyz";
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

/// Settings shared by [`crate::BountyClient`] and [`crate::AsyncBountyClient`]
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Wallet used when a claim or submission does not name one
    pub wallet_address: Option<String>,
    /// Total attempts per request (at least one is always made)
    pub max_retries: u32,
    /// Fixed wait between attempts
    pub retry_delay: Duration,
    pub timeout: Duration,
}

/// On-disk layout of config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    client: ClientSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct ClientSection {
    base_url: String,
    wallet_address: String,
    max_retries: u32,
    retry_delay_ms: u64,
    timeout_secs: u64,
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            wallet_address: String::new(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY.as_millis() as u64,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl From<ClientSection> for ClientConfig {
    fn from(section: ClientSection) -> Self {
        ClientConfig::new(section.base_url)
            .with_wallet(section.wallet_address)
            .with_max_retries(section.max_retries)
            .with_retry_delay(Duration::from_millis(section.retry_delay_ms))
            .with_timeout(Duration::from_secs(section.timeout_secs))
    }
}

impl ClientConfig {
    /// Configuration for `base_url` with default retry settings.
    /// A trailing slash is stripped; an empty URL selects the public board.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        let base_url = base_url.trim().trim_end_matches('/');
        Self {
            base_url: if base_url.is_empty() {
                DEFAULT_BASE_URL.to_string()
            } else {
                base_url.to_string()
            },
            wallet_address: None,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the default wallet; an empty address clears it
    pub fn with_wallet(mut self, wallet: impl Into<String>) -> Self {
        let wallet = wallet.into();
        self.wallet_address = if wallet.trim().is_empty() {
            None
        } else {
            Some(wallet.trim().to_string())
        };
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load from config.toml (if present) and apply environment overrides
    pub fn load() -> Result<Self> {
        Ok(Self::load_from("config.toml")?.apply_env())
    }

    /// Load from specific path, falling back to the embedded defaults
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file: ConfigFile = if path.exists() {
            let content = std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")?
        } else {
            toml::from_str(DEFAULT_CONFIG).context("Failed to parse default config")?
        };

        Ok(file.client.into())
    }

    /// Override settings from `OWOCKIBOT_*` environment variables
    pub fn apply_env(self) -> Self {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Override settings from `lookup`; empty or malformed values are ignored
    pub fn apply_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("OWOCKIBOT_BASE_URL") {
            self.base_url = Self::new(url).base_url;
        }
        if let Some(wallet) = get("OWOCKIBOT_WALLET") {
            self = self.with_wallet(wallet);
        }
        if let Some(retries) = get("OWOCKIBOT_MAX_RETRIES").and_then(|v| v.trim().parse().ok()) {
            self.max_retries = retries;
        }
        if let Some(ms) = get("OWOCKIBOT_RETRY_DELAY_MS").and_then(|v| v.trim().parse().ok()) {
            self.retry_delay = Duration::from_millis(ms);
        }
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        // The embedded config is part of the crate; fall back to constants if
        // it was edited into something unparsable.
        toml::from_str::<ConfigFile>(DEFAULT_CONFIG)
            .map(|file| file.client.into())
            .unwrap_or_else(|_| ClientConfig::new(DEFAULT_BASE_URL))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "https://bounty.owockibot.xyz");
        assert_eq!(config.wallet_address, None);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_delay, Duration::from_secs(1));
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_strips_trailing_slash() {
        let config = ClientConfig::new("https://board.example.com/");
        assert_eq!(config.base_url, "https://board.example.com");
    }

    #[test]
    fn test_empty_wallet_is_none() {
        let config = ClientConfig::default().with_wallet("  ");
        assert_eq!(config.wallet_address, None);
        let config = config.with_wallet("0xabc");
        assert_eq!(config.wallet_address.as_deref(), Some("0xabc"));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = ClientConfig::load_from("/nonexistent/owockibot.toml").unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("owockibot-config-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[client]\nbase_url = \"http://localhost:8080/\"\nwallet_address = \"0xfeed\"\nmax_retries = 5\nretry_delay_ms = 250\n",
        )
        .unwrap();

        let config = ClientConfig::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.wallet_address.as_deref(), Some("0xfeed"));
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.retry_delay, Duration::from_millis(250));
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("OWOCKIBOT_BASE_URL", "http://127.0.0.1:9000/"),
            ("OWOCKIBOT_WALLET", "0xenv"),
            ("OWOCKIBOT_MAX_RETRIES", "7"),
            ("OWOCKIBOT_RETRY_DELAY_MS", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let config = ClientConfig::default()
            .with_retry_delay(Duration::from_millis(10))
            .apply_env_from(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.wallet_address.as_deref(), Some("0xenv"));
        assert_eq!(config.max_retries, 7);
        assert_eq!(config.retry_delay, Duration::from_millis(10));
    }

    #[test]
    fn test_env_empty_values_ignored() {
        let config = ClientConfig::default()
            .with_wallet("0xfile")
            .apply_env_from(|key| (key == "OWOCKIBOT_WALLET").then(String::new));
        assert_eq!(config.wallet_address.as_deref(), Some("0xfile"));
    }
}
