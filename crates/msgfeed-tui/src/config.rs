use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow};

use msgfeed_core::ThemeParams;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 10_000;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,
    /// Theme handed over by an embedding host. Absent when running standalone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<ThemeParams>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_refresh_interval_ms() -> u64 {
    DEFAULT_REFRESH_INTERVAL_MS
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            base_url: default_base_url(),
            limit: None,
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
            host: None,
        }
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, config_content)?;
        Ok(())
    }

    /// Remember the limit selection for the next start.
    pub fn save_limit(config_path: &Path, limit: u32) -> Result<()> {
        let mut config = Self::load_from(config_path).unwrap_or_else(|_| Self::new());
        config.limit = Some(limit);
        config.save_to(config_path)
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("msgfeed").join("config.json"))
    }
}
