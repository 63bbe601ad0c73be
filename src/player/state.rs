use serde::Serialize;
use tokio::sync::oneshot;

use crate::catalog::EpisodeId;

/// Commands that can be sent to the controller's run loop.
#[derive(Debug)]
pub enum PlayerCommand {
    TogglePlay,
    /// Target position as a percentage of the duration.
    SeekTo(f64),
    /// Pointer offset within the progress track, `0.0..=1.0`.
    SeekFromClick(f64),
    SetVolume(u8),
    ToggleMute,
    ToggleFullscreen,
    SelectEpisode(EpisodeId),
    ToggleEpisodeList,
    SetControlsVisible(bool),
    GetState(oneshot::Sender<PlaybackState>),
    Shutdown,
}

/// A media failure surfaced separately from the paused state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackError {
    pub episode_id: EpisodeId,
    pub message: String,
}

/// Canonical playback state owned by one controller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackState {
    pub is_playing: bool,
    pub is_muted: bool,
    /// 0 to 100
    pub volume: u8,
    pub current_time_seconds: f64,
    /// 0 until the first metadata arrives; kept across episode switches.
    pub duration_seconds: f64,
    pub progress_percent: f64,
    /// Mirrors the platform's fullscreen element.
    pub is_fullscreen: bool,
    pub selected_episode_id: EpisodeId,
    pub is_episode_list_visible: bool,
    /// Whether the current episode's metadata has loaded.
    pub metadata_loaded: bool,
    pub is_loading: bool,
    pub controls_visible: bool,
    /// Seconds requested by an uncommitted seek. While set,
    /// `progress_percent` is the requested value, not a derived one.
    pub pending_seek_seconds: Option<f64>,
    pub error: Option<PlaybackError>,
}

impl PlaybackState {
    pub(crate) fn new(selected_episode_id: EpisodeId, volume: u8) -> Self {
        PlaybackState {
            is_playing: false,
            is_muted: volume == 0,
            volume,
            current_time_seconds: 0.0,
            duration_seconds: 0.0,
            progress_percent: 0.0,
            is_fullscreen: false,
            selected_episode_id,
            is_episode_list_visible: false,
            metadata_loaded: false,
            is_loading: true,
            controls_visible: false,
            pending_seek_seconds: None,
            error: None,
        }
    }

    /// Duration usable for seeking and progress: known and positive.
    pub fn known_duration(&self) -> Option<f64> {
        if self.metadata_loaded && self.duration_seconds.is_finite() && self.duration_seconds > 0.0 {
            Some(self.duration_seconds)
        } else {
            None
        }
    }

    /// Rewinds to the start without touching duration, volume or mute.
    pub(crate) fn rewind(&mut self) {
        self.is_playing = false;
        self.current_time_seconds = 0.0;
        self.progress_percent = 0.0;
        self.pending_seek_seconds = None;
    }
}

/// Updates broadcast by the controller about its state changes.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerStateUpdate {
    Playing { episode_id: EpisodeId },
    Paused { episode_id: EpisodeId },
    Progress {
        current_time_seconds: f64,
        duration_seconds: f64,
        progress_percent: f64,
    },
    VolumeChanged { volume: u8, is_muted: bool },
    FullscreenChanged(bool),
    EpisodeSelected { episode_id: EpisodeId },
    MetadataLoaded { duration_seconds: f64 },
    Ended { episode_id: EpisodeId },
    EpisodeListToggled(bool),
    ControlsToggled(bool),
    Error(String),
}
