use thiserror::Error;

/// Error types reported by a media element.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MediaError {
    #[error("No source loaded")]
    NoSource,
    #[error("Failed to load {url}: {reason}")]
    LoadFailed { url: String, reason: String },
    #[error("Play request rejected: {0}")]
    PlayRejected(String),
    #[error("Fullscreen request rejected: {0}")]
    FullscreenRejected(String),
}
