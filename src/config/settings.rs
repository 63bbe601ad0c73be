//! Player settings and configuration management

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::catalog::{CatalogError, EpisodeList};
use crate::player::{ControllerOptions, UnknownEpisodePolicy, DEFAULT_VOLUME};

/// Player settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// Volume a newly mounted player starts at (0-100)
    #[serde(default = "default_volume")]
    pub initial_volume: u8,
    /// What to do when asked to select an episode that is not in the list
    #[serde(default)]
    pub unknown_episode_policy: UnknownEpisodePolicy,
    /// How often the simulated media element reports its position
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Host that poster and thumbnail references are resolved against
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    /// JSON episode list or single video URL loaded at startup
    #[serde(default)]
    pub episodes_file: Option<String>,
    /// Episodes used when no list is supplied
    #[serde(default = "EpisodeList::fallback")]
    pub fallback_episodes: EpisodeList,
}

fn default_volume() -> u8 {
    DEFAULT_VOLUME
}

fn default_tick_interval_ms() -> u64 {
    250
}

fn default_image_base_url() -> String {
    "https://images.unsplash.com".to_string()
}

/// Error types for configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Fallback episodes: {0}")]
    CatalogError(#[from] CatalogError),
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            initial_volume: default_volume(),
            unknown_episode_policy: UnknownEpisodePolicy::default(),
            tick_interval_ms: default_tick_interval_ms(),
            image_base_url: default_image_base_url(),
            episodes_file: None,
            fallback_episodes: EpisodeList::fallback(),
        }
    }
}

impl Settings {
    /// Load settings from a file, or defaults if it does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(&self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, content)?;
        Ok(())
    }

    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config").join("episode-player").join("config.json")
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_volume > 100 {
            return Err(ConfigError::ValidationError(format!(
                "Initial volume must be between 0 and 100, got {}",
                self.initial_volume
            )));
        }

        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ValidationError("Tick interval cannot be zero".to_string()));
        }

        if self.image_base_url.is_empty() {
            return Err(ConfigError::ValidationError("Image base URL cannot be empty".to_string()));
        }

        if self.fallback_episodes.is_empty() {
            return Err(ConfigError::ValidationError("Fallback episode list cannot be empty".to_string()));
        }
        self.fallback_episodes.validate()?;

        Ok(())
    }
}

impl From<&Settings> for ControllerOptions {
    fn from(settings: &Settings) -> Self {
        ControllerOptions {
            fallback_episodes: settings.fallback_episodes.clone(),
            initial_volume: settings.initial_volume,
            unknown_episode_policy: settings.unknown_episode_policy,
            ..ControllerOptions::default()
        }
    }
}
