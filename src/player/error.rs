use thiserror::Error;

use crate::catalog::EpisodeId;

/// Error types returned by controller operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlayerError {
    #[error("Episode {0} is not in the episode list")]
    UnknownEpisode(EpisodeId),
    #[error("No episodes to play and no fallback list configured")]
    EmptyEpisodeList,
}
