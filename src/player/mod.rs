use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, instrument, trace, warn};

use crate::catalog::{Episode, EpisodeId, EpisodeList};
use crate::media::{LoadGeneration, MediaElement, MediaEvent, SourceEvent};

mod command_handler;
mod error;
mod event_handler;
mod run_loop;
mod state;
mod time_format;

pub use error::PlayerError;
pub use state::{PlaybackError, PlaybackState, PlayerCommand, PlayerStateUpdate};
pub use time_format::{format_time, UNKNOWN_TIME};

const PLAYER_LOG_TARGET: &str = "r_episode_player::player";

/// Volume a freshly mounted player starts at.
pub const DEFAULT_VOLUME: u8 = 75;

/// What `select_episode` does with an id missing from the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownEpisodePolicy {
    /// Return [`PlayerError::UnknownEpisode`] and leave the state untouched.
    #[default]
    Reject,
    /// Select the first entry of the list instead.
    FallbackToFirst,
}

/// Construction parameters for a [`PlaybackController`].
#[derive(Debug, Clone)]
pub struct ControllerOptions {
    /// Used when the caller supplies an empty episode list.
    pub fallback_episodes: EpisodeList,
    pub initial_volume: u8,
    pub unknown_episode_policy: UnknownEpisodePolicy,
    /// Capacity of the state update broadcast channel.
    pub update_capacity: usize,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        ControllerOptions {
            fallback_episodes: EpisodeList::fallback(),
            initial_volume: DEFAULT_VOLUME,
            unknown_episode_policy: UnknownEpisodePolicy::default(),
            update_capacity: 64,
        }
    }
}

/// Invoked with the new id whenever the user switches episodes.
pub type OnEpisodeSelect = Box<dyn FnMut(EpisodeId) + Send + 'static>;

/// Owns the playback state of one mounted player and mediates between user
/// intents and the media element.
pub struct PlaybackController {
    episodes: EpisodeList,
    unknown_episode_policy: UnknownEpisodePolicy,
    state: PlaybackState,
    media: Box<dyn MediaElement>,
    /// Generation of the source currently attached, `None` if loading failed.
    generation: Option<LoadGeneration>,
    on_episode_select: Option<OnEpisodeSelect>,
    state_update_tx: broadcast::Sender<PlayerStateUpdate>,
}

impl PlaybackController {
    /// Mounts a player on `episodes`, loading `initial_episode` (or the first
    /// entry if it is absent). An empty list is replaced by the configured
    /// fallback list.
    #[instrument(skip(episodes, options, media), fields(episode_count = episodes.len()))]
    pub fn new(
        episodes: EpisodeList,
        initial_episode: Option<EpisodeId>,
        options: ControllerOptions,
        media: Box<dyn MediaElement>,
    ) -> Result<Self, PlayerError> {
        let episodes = if episodes.is_empty() {
            info!(target: PLAYER_LOG_TARGET, "No episodes supplied, using {} fallback episodes.", options.fallback_episodes.len());
            options.fallback_episodes
        } else {
            episodes
        };

        let selected = initial_episode
            .and_then(|id| episodes.find(id))
            .or_else(|| episodes.first())
            .map(|ep| ep.id)
            .ok_or(PlayerError::EmptyEpisodeList)?;
        if initial_episode.is_some_and(|id| id != selected) {
            debug!(target: PLAYER_LOG_TARGET, "Initial episode {:?} not found, selecting {}.", initial_episode, selected);
        }

        let volume = options.initial_volume.min(100);
        let (state_update_tx, _) = broadcast::channel(options.update_capacity.max(1));
        let mut controller = PlaybackController {
            episodes,
            unknown_episode_policy: options.unknown_episode_policy,
            state: PlaybackState::new(selected, volume),
            media,
            generation: None,
            on_episode_select: None,
            state_update_tx,
        };

        if let Err(e) = controller.media.set_volume(f64::from(volume) / 100.0) {
            warn!(target: PLAYER_LOG_TARGET, "Media refused initial volume: {}", e);
        }
        controller.load_selected();
        Ok(controller)
    }

    /// Registers the `onEpisodeSelect` notification.
    pub fn set_on_episode_select(&mut self, callback: OnEpisodeSelect) {
        self.on_episode_select = Some(callback);
    }

    /// Subscribes to player state updates.
    pub fn subscribe_state_updates(&self) -> broadcast::Receiver<PlayerStateUpdate> {
        self.state_update_tx.subscribe()
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn episodes(&self) -> &EpisodeList {
        &self.episodes
    }

    /// The episode currently loaded.
    pub fn current_episode(&self) -> Option<&Episode> {
        self.episodes.find(self.state.selected_episode_id)
    }

    // --- User intents ---

    pub fn toggle_play(&mut self) {
        command_handler::handle_toggle_play(self)
    }

    /// Seeks to `percent` of the duration. No-op until metadata has loaded.
    pub fn seek_to(&mut self, percent: f64) {
        command_handler::handle_seek_to(self, percent)
    }

    /// Seeks to the position clicked on the progress track.
    pub fn seek_from_click_position(&mut self, offset_ratio: f64) {
        command_handler::handle_seek_to(self, offset_ratio * 100.0)
    }

    pub fn set_volume(&mut self, level: u8) {
        command_handler::handle_set_volume(self, level)
    }

    pub fn toggle_mute(&mut self) {
        command_handler::handle_toggle_mute(self)
    }

    pub fn toggle_fullscreen(&mut self) {
        command_handler::handle_toggle_fullscreen(self)
    }

    pub fn select_episode(&mut self, id: EpisodeId) -> Result<(), PlayerError> {
        command_handler::handle_select_episode(self, id)
    }

    pub fn toggle_episode_list(&mut self) {
        self.state.is_episode_list_visible = !self.state.is_episode_list_visible;
        self.broadcast_update(PlayerStateUpdate::EpisodeListToggled(self.state.is_episode_list_visible));
    }

    pub fn set_controls_visible(&mut self, visible: bool) {
        if self.state.controls_visible != visible {
            self.state.controls_visible = visible;
            self.broadcast_update(PlayerStateUpdate::ControlsToggled(visible));
        }
    }

    // --- Media events ---

    pub fn on_time_update(&mut self, current_time: f64, duration: Option<f64>) {
        event_handler::handle_time_update(self, current_time, duration)
    }

    pub fn on_loaded_metadata(&mut self, duration: f64) {
        event_handler::handle_loaded_metadata(self, duration)
    }

    pub fn on_ended(&mut self) {
        event_handler::handle_ended(self)
    }

    pub fn on_fullscreen_change(&mut self, is_fullscreen: bool) {
        event_handler::handle_fullscreen_change(self, is_fullscreen)
    }

    pub fn on_error(&mut self, message: &str) {
        event_handler::handle_error(self, message)
    }

    /// Routes a media event to its transition function.
    pub fn handle_media_event(&mut self, event: MediaEvent) {
        trace!(target: PLAYER_LOG_TARGET, "Media event: {:?}", event);
        match event {
            MediaEvent::TimeUpdate { current_time, duration } => self.on_time_update(current_time, duration),
            MediaEvent::LoadedMetadata { duration } => self.on_loaded_metadata(duration),
            MediaEvent::Ended => self.on_ended(),
            MediaEvent::FullscreenChange(is_fullscreen) => self.on_fullscreen_change(is_fullscreen),
            MediaEvent::Error(message) => self.on_error(&message),
        }
    }

    /// Routes an event from the element's channel. Source events from an
    /// earlier load are dropped.
    pub fn handle_source_event(&mut self, source_event: SourceEvent) {
        let SourceEvent { generation, event } = source_event;
        if event.is_source_scoped() && self.generation != Some(generation) {
            debug!(target: PLAYER_LOG_TARGET, generation, "Dropping stale media event {:?}", event);
            return;
        }
        self.handle_media_event(event);
    }

    /// Runs the command and event loop until `Shutdown` or until both
    /// channels close.
    pub async fn run(
        &mut self,
        commands: mpsc::Receiver<PlayerCommand>,
        events: mpsc::UnboundedReceiver<SourceEvent>,
    ) {
        run_loop::run_player_loop(self, commands, events).await;
    }

    // --- Private helpers ---

    /// Sends a state update via the broadcast channel.
    fn broadcast_update(&self, update: PlayerStateUpdate) {
        trace!(target: PLAYER_LOG_TARGET, "Broadcasting state update: {:?}", update);
        if self.state_update_tx.send(update).is_err() {
            trace!(target: PLAYER_LOG_TARGET, "No active listeners for state update.");
        }
    }

    fn broadcast_progress(&self) {
        self.broadcast_update(PlayerStateUpdate::Progress {
            current_time_seconds: self.state.current_time_seconds,
            duration_seconds: self.state.duration_seconds,
            progress_percent: self.state.progress_percent,
        });
    }

    /// Points the media element at the selected episode's source.
    fn load_selected(&mut self) {
        let Some(url) = self.current_episode().map(|ep| ep.source_url.clone()) else {
            return;
        };
        self.state.metadata_loaded = false;
        self.state.is_loading = true;
        self.state.error = None;
        info!(target: PLAYER_LOG_TARGET, episode_id = self.state.selected_episode_id, "Loading {}", url);
        match self.media.load(&url) {
            Ok(generation) => self.generation = Some(generation),
            Err(e) => {
                warn!(target: PLAYER_LOG_TARGET, "Media refused to load {}: {}", url, e);
                self.generation = None;
                let message = e.to_string();
                event_handler::handle_error(self, &message);
            }
        }
    }
}
