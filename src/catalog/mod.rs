//! Episode catalog: descriptors, the placeholder playlist and JSON loading

mod defaults;
mod error;
pub mod models;

pub use error::CatalogError;
pub use models::{Episode, EpisodeId, EpisodeList};

use std::fs;
use std::path::Path;
use tracing::{debug, info};
use url::Url;

const LOG_TARGET: &str = "r_episode_player::catalog";

/// Loads a JSON array of episodes and validates it.
pub fn load_episodes(path: &Path) -> Result<EpisodeList, CatalogError> {
    debug!(target: LOG_TARGET, "Reading episode list from {}", path.display());
    let content = fs::read_to_string(path)?;
    let episodes: EpisodeList = serde_json::from_str(&content)?;
    episodes.validate()?;
    info!(target: LOG_TARGET, "Loaded {} episodes from {}", episodes.len(), path.display());
    Ok(episodes)
}

/// Resolves the `--episodes` argument: an `http(s)` URL plays as a single
/// title, anything else is read as an episode list file.
pub fn load_source(source: &str) -> Result<EpisodeList, CatalogError> {
    match Url::parse(source) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            info!(target: LOG_TARGET, "Playing single video {}", source);
            Ok(EpisodeList::new(vec![Episode::single(source, None)]))
        }
        _ => load_episodes(Path::new(source)),
    }
}
