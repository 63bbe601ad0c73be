use std::io;
use thiserror::Error;

use super::models::EpisodeId;

/// Errors raised while loading or validating an episode list.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Duplicate episode id: {0}")]
    DuplicateId(EpisodeId),
    #[error("Episode {id} has an invalid source URL: {source}")]
    InvalidSourceUrl { id: EpisodeId, source: url::ParseError },
}
