// src/models/config.rs

//! Application configuration structures.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::ReleaseChannel;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Polling behavior settings
    #[serde(default)]
    pub poller: PollerConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Persistent state settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Notification feed subscriptions
    #[serde(default)]
    pub feeds: Vec<FeedConfig>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.poller.poll_interval_secs == 0 {
            return Err(AppError::config("poller.poll_interval_secs must be > 0"));
        }
        if self.poller.download_timeout_secs == 0 {
            return Err(AppError::config("poller.download_timeout_secs must be > 0"));
        }
        if self.poller.base_domain.trim().is_empty() {
            return Err(AppError::config("poller.base_domain is empty"));
        }
        if self.poller.channels.is_empty() {
            return Err(AppError::config("No release channels configured"));
        }
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::config("http.user_agent is empty"));
        }
        if self.storage.releases_file.trim().is_empty() {
            return Err(AppError::config("storage.releases_file is empty"));
        }
        for feed in &self.feeds {
            if feed.id.trim().is_empty() {
                return Err(AppError::config("feed with empty id"));
            }
            if !feed.url.starts_with("http://") && !feed.url.starts_with("https://") {
                return Err(AppError::config(format!(
                    "feed '{}' has a non-http url",
                    feed.id
                )));
            }
            for name in &feed.channels {
                name.parse::<ReleaseChannel>()
                    .map_err(|e| AppError::config(format!("feed '{}': {e}", feed.id)))?;
            }
        }
        Ok(())
    }
}

/// Polling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerConfig {
    /// Seconds to sleep between successful poll cycles
    #[serde(default = "defaults::poll_interval")]
    pub poll_interval_secs: u64,

    /// Read timeout for the main asset download, in seconds
    #[serde(default = "defaults::download_timeout")]
    pub download_timeout_secs: u64,

    /// Domain serving the monitored application
    #[serde(default = "defaults::base_domain")]
    pub base_domain: String,

    /// Channels to poll
    #[serde(default = "defaults::channels")]
    pub channels: Vec<ReleaseChannel>,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: defaults::poll_interval(),
            download_timeout_secs: defaults::download_timeout(),
            base_domain: defaults::base_domain(),
            channels: defaults::channels(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Extra headers sent with every request
    #[serde(default = "defaults::headers")]
    pub headers: HashMap<String, String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            headers: defaults::headers(),
        }
    }
}

/// Persistent state settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the JSON file holding last-seen build ids
    #[serde(default = "defaults::releases_file")]
    pub releases_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            releases_file: defaults::releases_file(),
        }
    }
}

/// One notification destination and the channels it subscribes to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Identifier used in logs and subscription lookup
    pub id: String,

    /// Webhook URL receiving the rendered notification
    pub url: String,

    /// Channel names this feed wants notified about (case-insensitive)
    #[serde(default)]
    pub channels: Vec<String>,
}

mod defaults {
    use std::collections::HashMap;

    use crate::models::ReleaseChannel;

    pub fn poll_interval() -> u64 {
        60
    }

    pub fn download_timeout() -> u64 {
        10
    }

    pub fn base_domain() -> String {
        "discordapp.com".into()
    }

    pub fn channels() -> Vec<ReleaseChannel> {
        ReleaseChannel::ALL.to_vec()
    }

    pub fn user_agent() -> String {
        format!("ReleaseRacer/{}", env!("CARGO_PKG_VERSION"))
    }

    pub fn headers() -> HashMap<String, String> {
        HashMap::from([(
            "X-Hey-Discord".to_string(),
            "We love you guys <3! We're just here for build notifications, please don't notice us."
                .to_string(),
        )])
    }

    pub fn releases_file() -> String {
        "releases.json".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.poller.poll_interval_secs, 60);
        assert_eq!(config.poller.download_timeout_secs, 10);
        assert_eq!(config.poller.channels.len(), 3);
    }

    #[test]
    fn parses_minimal_toml() {
        let config: Config = toml::from_str(
            r#"
            [poller]
            poll_interval_secs = 30
            channels = ["canary"]

            [[feeds]]
            id = "releases"
            url = "https://example.com/hook"
            channels = ["Canary", "stable"]
            "#,
        )
        .unwrap();

        assert_eq!(config.poller.poll_interval_secs, 30);
        assert_eq!(config.poller.channels, vec![ReleaseChannel::Canary]);
        assert_eq!(config.feeds.len(), 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_interval() {
        let mut config = Config::default();
        config.poller.poll_interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_unknown_feed_channel() {
        let mut config = Config::default();
        config.feeds.push(FeedConfig {
            id: "bad".into(),
            url: "https://example.com/hook".into(),
            channels: vec!["nightly".into()],
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_non_http_feed_url() {
        let mut config = Config::default();
        config.feeds.push(FeedConfig {
            id: "bad".into(),
            url: "ftp://example.com/hook".into(),
            channels: vec!["stable".into()],
        });
        assert!(config.validate().is_err());
    }
}
