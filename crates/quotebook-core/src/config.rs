//! Application configuration management.
//!
//! Configuration is stored at `~/.config/quotebook/config.json` and
//! covers the remote store endpoint, the optional bearer token, and
//! the uniform cache TTL override.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "quotebook";

/// Config file name
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Base URL of the remote document store, e.g.
    /// `https://store.example.com/api`.
    pub api_base_url: Option<String>,
    pub api_token: Option<String>,
    /// Tenant identifier; scopes the cache directory so switching
    /// workspaces never serves another tenant's snapshots.
    pub workspace_id: Option<String>,
    /// Uniform TTL in minutes for every collection. Absent means the
    /// built-in 5-minute default. There is deliberately no
    /// per-collection knob.
    pub cache_ttl_minutes: Option<i64>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir =
            dirs::cache_dir().ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;

        let mut path = cache_dir.join(APP_NAME);
        if let Some(ref workspace) = self.workspace_id {
            path = path.join(workspace);
        }
        Ok(path)
    }

    /// TTL override as a duration, when one is configured.
    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl_minutes.map(Duration::minutes)
    }
}
