//! Integration tests for configuration management
//!
//! These tests verify that settings, the episode catalog and the controller
//! options fit together across module boundaries.

use crate::test_utils::{episode, write_episodes};
use r_episode_player::catalog::{load_episodes, EpisodeList};
use r_episode_player::config::{ConfigError, Settings};
use r_episode_player::player::{ControllerOptions, UnknownEpisodePolicy};
use std::error::Error;
use tempfile::tempdir;

#[cfg(test)]
mod config_integration_tests {
    use super::*;

    /// Test complete configuration workflow
    #[test]
    fn test_config_lifecycle() -> Result<(), Box<dyn Error>> {
        let dir = tempdir()?;
        let config_path = dir.path().join("config.json");
        let episodes_path = dir.path().join("episodes.json");

        let episodes = EpisodeList::new(vec![episode(11, "21:30"), episode(12, "22:10")]);
        write_episodes(&episodes_path, &episodes)?;

        let mut settings = Settings::default();
        settings.initial_volume = 55;
        settings.unknown_episode_policy = UnknownEpisodePolicy::FallbackToFirst;
        settings.episodes_file = Some(episodes_path.to_string_lossy().into_owned());

        settings.validate()?;
        settings.save(&config_path)?;

        let loaded = Settings::load(&config_path)?;
        assert_eq!(loaded.initial_volume, 55);
        assert_eq!(loaded.unknown_episode_policy, UnknownEpisodePolicy::FallbackToFirst);

        let path = loaded.episodes_file.as_deref().unwrap();
        let reloaded = load_episodes(std::path::Path::new(path))?;
        assert_eq!(reloaded, episodes);

        let options = ControllerOptions::from(&loaded);
        assert_eq!(options.initial_volume, 55);
        assert_eq!(options.fallback_episodes.len(), 3);

        let mut updated = loaded;
        updated.tick_interval_ms = 100;
        updated.save(&config_path)?;
        assert_eq!(Settings::load(&config_path)?.tick_interval_ms, 100);

        Ok(())
    }

    /// Test invalid configuration handling
    #[test]
    fn test_invalid_config_validation() -> Result<(), Box<dyn Error>> {
        let mut settings = Settings::default();
        settings.image_base_url = String::new();
        let result = settings.validate();
        assert!(result.is_err());
        if let Err(e) = result {
            assert!(e.to_string().contains("Image base URL cannot be empty"));
        }

        let dir = tempdir()?;
        let config_path = dir.path().join("config.json");
        std::fs::write(&config_path, "{ \"initial_volume\": \"loud\" }")?;
        assert!(matches!(Settings::load(&config_path), Err(ConfigError::ParseError(_))));
        Ok(())
    }
}
