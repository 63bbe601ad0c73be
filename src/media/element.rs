use super::error::MediaError;

/// Counts `load` calls on one element. Each source gets a fresh generation.
pub type LoadGeneration = u64;

/// Commands accepted by the platform's playable element.
///
/// Every command is fire-and-forget: the element confirms asynchronously by
/// emitting [`MediaEvent`]s, never by return value. An `Err` only means the
/// request was refused outright.
pub trait MediaElement: Send {
    /// Detaches the current source and starts loading `url`. Returns the
    /// generation stamped on every event this source emits from now on.
    fn load(&mut self, url: &str) -> Result<LoadGeneration, MediaError>;

    fn play(&mut self) -> Result<(), MediaError>;

    fn pause(&mut self) -> Result<(), MediaError>;

    /// Jumps to `seconds` from the start of the media.
    fn set_current_time(&mut self, seconds: f64) -> Result<(), MediaError>;

    /// Sets the output volume in the range `0.0..=1.0`.
    fn set_volume(&mut self, volume: f64) -> Result<(), MediaError>;

    fn set_muted(&mut self, muted: bool) -> Result<(), MediaError>;

    fn request_fullscreen(&mut self) -> Result<(), MediaError>;

    fn exit_fullscreen(&mut self) -> Result<(), MediaError>;
}

/// Notifications emitted by a media element.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Periodic position report. `duration` is `None` (or NaN) until metadata loads.
    TimeUpdate { current_time: f64, duration: Option<f64> },
    LoadedMetadata { duration: f64 },
    Ended,
    /// The platform's fullscreen element changed.
    FullscreenChange(bool),
    Error(String),
}

impl MediaEvent {
    /// Whether the event describes the loaded source rather than the
    /// element's container. Only source events go stale on a reload.
    pub fn is_source_scoped(&self) -> bool {
        !matches!(self, MediaEvent::FullscreenChange(_))
    }
}

/// A [`MediaEvent`] tagged with the load that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceEvent {
    pub generation: LoadGeneration,
    pub event: MediaEvent,
}
