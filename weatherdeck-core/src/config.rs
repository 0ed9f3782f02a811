use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};

use crate::client::{DEFAULT_BASE_URL, WeatherClient};

/// Environment variable that overrides the stored access key.
pub const ACCESS_KEY_ENV: &str = "WEATHERDECK_ACCESS_KEY";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// access_key = "..."
/// # base_url = "https://api.weatherstack.com"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Provider access credential. The environment variable wins over this.
    pub access_key: Option<String>,

    /// Provider endpoint override; rarely set outside tests and proxies.
    pub base_url: Option<String>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weatherdeck", "weatherdeck")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_access_key(&mut self, access_key: String) {
        self.access_key = Some(access_key);
    }

    /// Resolve the access credential: environment first, then the config file.
    pub fn resolve_access_key(&self) -> Result<String> {
        if let Ok(key) = env::var(ACCESS_KEY_ENV) {
            if !key.trim().is_empty() {
                return Ok(key);
            }
        }

        self.access_key
            .as_ref()
            .filter(|key| !key.trim().is_empty())
            .cloned()
            .ok_or_else(|| {
                anyhow!(
                    "No provider access key configured.\n\
                     Hint: run `weatherdeck configure`, or set {ACCESS_KEY_ENV}."
                )
            })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Build the bound client from this configuration.
    pub fn client(&self) -> Result<WeatherClient> {
        let access_key = self.resolve_access_key()?;
        Ok(WeatherClient::with_base_url(access_key, self.base_url().to_string()))
    }
}
