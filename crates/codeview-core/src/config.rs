//! Viewer configuration.
//!
//! ## Learning: Serde for Serialization
//!
//! `#[derive(Serialize, Deserialize)]` generates the TOML conversion.
//! `#[serde(default)]` fills missing fields from `Default::default()`, so a
//! config file only needs the keys it wants to change.

use codeview_syntax::HighlightMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main viewer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tab switching and highlighting
    pub view: ViewConfig,

    /// Copy button behavior
    pub copy: CopyConfig,
}

impl Config {
    /// Loads config from the default location, falling back to defaults.
    pub fn load() -> Self {
        match Self::load_from_default_path() {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("Using default config: {}", err);
                Self::default()
            }
        }
    }

    /// Loads config from a file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    fn load_from_default_path() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the default config file path.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("codeview").join("config.toml"))
    }

    /// Saves the config to the given path, creating parent directories.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Saves the config to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(Self::default_path()?)
    }
}

/// Tab switching configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Snippet shown on startup
    pub default_snippet: String,

    /// Delay between hiding the surface and swapping its content (ms)
    pub swap_delay_ms: u64,

    /// Highlighting strategy
    pub highlight_mode: HighlightMode,
}

impl ViewConfig {
    pub fn swap_delay(&self) -> Duration {
        Duration::from_millis(self.swap_delay_ms)
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            default_snippet: "client".to_string(),
            swap_delay_ms: 150,
            highlight_mode: HighlightMode::default(),
        }
    }
}

/// Copy button configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CopyConfig {
    /// How long the confirmation stays visible (ms)
    pub confirmation_ms: u64,

    /// Button label while idle
    pub idle_label: String,

    /// Button label after a successful copy
    pub copied_label: String,
}

impl CopyConfig {
    pub fn confirmation_delay(&self) -> Duration {
        Duration::from_millis(self.confirmation_ms)
    }
}

impl Default for CopyConfig {
    fn default() -> Self {
        Self {
            confirmation_ms: 2000,
            idle_label: "Copy".to_string(),
            copied_label: "Copied!".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config directory not found")]
    NoConfigDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
