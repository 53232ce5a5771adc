//! Viewer configuration

use crate::error::{NavError, Result};
use directories::ProjectDirs;
use nav_log::LogConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main viewer configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub debounce: DebounceConfig,
    pub preload: PreloadConfig,
    pub log: LogConfig,
}

/// Navigation debounce ("lazy load") delays
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebounceConfig {
    /// Delay when the target is already being warmed
    pub short_delay_ms: u64,
    /// Delay when the target has to be fetched cold
    pub long_delay_ms: u64,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            short_delay_ms: 50,
            long_delay_ms: 500,
        }
    }
}

impl DebounceConfig {
    pub fn short_delay(&self) -> Duration {
        Duration::from_millis(self.short_delay_ms)
    }

    pub fn long_delay(&self) -> Duration {
        Duration::from_millis(self.long_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreloadConfig {
    pub enabled: bool,
    /// Upper bound on the number of warmed items per generation
    pub max_items: usize,
}

impl Default for PreloadConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_items: 3,
        }
    }
}

impl ViewerConfig {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("Using default configuration");
            Ok(Self::default())
        }
    }

    /// Load and validate configuration from a file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        tracing::info!("Configuration loaded from {:?}", path);
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        tracing::info!("Configuration saved to {:?}", path);
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.debounce.short_delay_ms > self.debounce.long_delay_ms {
            return Err(NavError::Config(format!(
                "debounce.short_delay_ms ({}) exceeds debounce.long_delay_ms ({})",
                self.debounce.short_delay_ms, self.debounce.long_delay_ms
            )));
        }
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("com", "postview", "postview")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("./config.toml"))
    }
}
