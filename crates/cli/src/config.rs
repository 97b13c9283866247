// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client configuration management.
//!
//! Configuration is stored in `<data dir>/config.toml`. Every section is
//! optional; a missing file yields the defaults. The API token may also be
//! supplied through `REEL_API_TOKEN`, which wins over the file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::env;
use crate::error::{Error, Result};

const DATA_DIR_NAME: &str = "reel";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Client configuration stored in `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub network: NetworkConfig,
}

/// Remote API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the movie API (default: "https://api.themoviedb.org/3").
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Account whose favorites are managed.
    #[serde(default = "default_account_id")]
    pub account_id: String,
    /// Bearer token. Prefer `REEL_API_TOKEN` over storing it here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Per-request timeout in seconds (default: 10).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Cache freshness settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Freshness window for server data in seconds (default: 3600).
    #[serde(default = "default_stale_secs")]
    pub stale_secs: u64,
    /// Freshness window for per-movie favorite status in seconds (default: 300).
    #[serde(default = "default_favorite_status_stale_secs")]
    pub favorite_status_stale_secs: u64,
    /// Age after which server data is dropped on restore, in seconds (default: 86400).
    #[serde(default = "default_gc_secs")]
    pub gc_secs: u64,
}

/// Retry policy for immediate (online) favorite toggles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries after the first failed attempt (default: 3).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Delay before the first retry in milliseconds (default: 1000).
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    /// Maximum delay between retries in seconds (default: 30).
    #[serde(default = "default_max_delay_secs")]
    pub max_delay_secs: u64,
}

/// Connectivity monitor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// How long the "back online" signal stays raised, in seconds (default: 3).
    #[serde(default = "default_banner_secs")]
    pub banner_secs: u64,
    /// Reachability probe timeout in milliseconds (default: 1500).
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
    /// Interval between reachability probes in `reel watch`, in seconds (default: 5).
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_account_id() -> String {
    "21752759".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_stale_secs() -> u64 {
    60 * 60
}

fn default_favorite_status_stale_secs() -> u64 {
    5 * 60
}

fn default_gc_secs() -> u64 {
    24 * 60 * 60
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_delay_ms() -> u64 {
    1_000
}

fn default_max_delay_secs() -> u64 {
    30
}

fn default_banner_secs() -> u64 {
    3
}

fn default_probe_timeout_ms() -> u64 {
    1_500
}

fn default_poll_interval_secs() -> u64 {
    5
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: default_base_url(),
            account_id: default_account_id(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            stale_secs: default_stale_secs(),
            favorite_status_stale_secs: default_favorite_status_stale_secs(),
            gc_secs: default_gc_secs(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_secs: default_max_delay_secs(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            banner_secs: default_banner_secs(),
            probe_timeout_ms: default_probe_timeout_ms(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// `host:port` of the API, used by the reachability probe.
    pub fn probe_address(&self) -> Option<String> {
        let url = reqwest::Url::parse(&self.base_url).ok()?;
        let host = url.host_str()?;
        let port = url.port_or_known_default()?;
        Some(format!("{host}:{port}"))
    }
}

impl NetworkConfig {
    pub fn banner_duration(&self) -> Duration {
        Duration::from_secs(self.banner_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

impl Config {
    /// Loads configuration from the given data directory.
    ///
    /// A missing `config.toml` is not an error.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let config_path = data_dir.join(CONFIG_FILE_NAME);
        let mut config = match fs::read_to_string(&config_path) {
            Ok(content) => toml::from_str(&content)
                .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Config::default(),
            Err(e) => return Err(Error::Config(format!("failed to read config: {}", e))),
        };
        config.validate()?;
        if let Some(token) = env::api_token() {
            config.api.token = Some(token);
        }
        Ok(config)
    }

    /// Saves configuration to the given data directory.
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        fs::create_dir_all(data_dir)?;
        let config_path = data_dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(&config_path, content)?;
        Ok(())
    }

    /// Checks values that would make the client misbehave.
    pub fn validate(&self) -> Result<()> {
        if reqwest::Url::parse(&self.api.base_url).is_err() {
            return Err(Error::Config(format!(
                "invalid api.base_url '{}': must be an absolute http(s) URL",
                self.api.base_url
            )));
        }
        if self.api.account_id.trim().is_empty() {
            return Err(Error::Config("api.account_id cannot be empty".to_string()));
        }
        if self.retry.initial_delay_ms == 0 {
            return Err(Error::Config(
                "retry.initial_delay_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Renders the configuration as TOML with the token masked.
    pub fn to_display_toml(&self) -> Result<String> {
        let mut shown = self.clone();
        if shown.api.token.is_some() {
            shown.api.token = Some("********".to_string());
        }
        toml::to_string_pretty(&shown)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))
    }
}

/// Resolves the data directory: explicit path, then `REEL_DATA_DIR`, then
/// the platform data dir.
pub fn resolve_data_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }
    if let Some(dir) = env::data_dir() {
        return Ok(dir);
    }
    dirs::data_dir()
        .map(|d| d.join(DATA_DIR_NAME))
        .ok_or(Error::NoDataDir)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
