//! Agente configuration management

use crate::articles::FetchFilter;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main Agente configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgenteConfig {
    /// Remote article store configuration
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Notification configuration
    #[serde(default)]
    pub notifications: NotificationsConfig,

    /// Feed view configuration
    #[serde(default)]
    pub feed: FeedConfig,
}

/// Remote article store configuration
///
/// The store is reached through a PostgREST-compatible endpoint at
/// `{url}/rest/v1/{table}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Base URL of the remote store
    pub url: String,

    /// API key sent as `apikey` and bearer token
    pub api_key: Option<String>,

    /// Collection holding the articles
    pub table: String,

    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:54321".to_string(),
            api_key: None,
            table: "articles".to_string(),
            timeout_secs: 15,
        }
    }
}

/// Notification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationsConfig {
    /// Time a notification stays visible, in milliseconds
    pub ttl_ms: u64,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self { ttl_ms: 3000 }
    }
}

/// Feed view configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Filter used for the first fetch of a session
    pub default_filter: FetchFilter,

    /// Push an error notification when a fetch fails
    pub notify_on_fetch_error: bool,

    /// Articles younger than this are flagged as new
    pub new_article_hours: i64,

    /// Reading speed used for read-time estimates
    pub words_per_minute: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            default_filter: FetchFilter::All,
            notify_on_fetch_error: false,
            new_article_hours: 6,
            words_per_minute: 200,
        }
    }
}

impl AgenteConfig {
    /// Load configuration from an optional TOML file, then apply
    /// `SUPABASE_URL` / `SUPABASE_KEY` from the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)?;
                Self::from_toml(&content)?
            }
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply environment overrides through a lookup function
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("SUPABASE_URL").filter(|v| !v.trim().is_empty()) {
            self.remote.url = url;
        }
        if let Some(key) = lookup("SUPABASE_KEY").filter(|v| !v.trim().is_empty()) {
            self.remote.api_key = Some(key);
        }
    }

    /// Reject configurations the client cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.remote.url.trim().is_empty() {
            return Err(Error::Config("remote.url must not be empty".to_string()));
        }
        if self.remote.table.trim().is_empty() {
            return Err(Error::Config("remote.table must not be empty".to_string()));
        }
        if self.notifications.ttl_ms == 0 {
            return Err(Error::Config(
                "notifications.ttl_ms must be greater than zero".to_string(),
            ));
        }
        if self.feed.words_per_minute == 0 {
            return Err(Error::Config(
                "feed.words_per_minute must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Default config file location (`<config dir>/agente/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs_next::config_dir().map(|dir| dir.join("agente").join("config.toml"))
    }
}
