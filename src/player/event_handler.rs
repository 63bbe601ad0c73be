use super::{PlaybackController, PlaybackError, PlayerStateUpdate, PLAYER_LOG_TARGET};
use tracing::{debug, info, instrument, trace, warn};

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Re-derives time and progress from the element's report. Commits any
/// pending seek.
#[instrument(level = "trace", skip(player))]
pub fn handle_time_update(player: &mut PlaybackController, current_time: f64, duration: Option<f64>) {
    let current_time = if current_time.is_finite() { current_time.max(0.0) } else { 0.0 };
    let duration = positive(duration).or_else(|| player.state.known_duration());

    let state = &mut player.state;
    state.pending_seek_seconds = None;
    if let (true, Some(duration)) = (state.metadata_loaded, duration) {
        state.duration_seconds = duration;
    }
    match duration {
        Some(duration) => {
            state.current_time_seconds = current_time.min(duration);
            state.progress_percent = (state.current_time_seconds / duration * 100.0).clamp(0.0, 100.0);
        }
        None => {
            state.current_time_seconds = current_time;
            state.progress_percent = 0.0;
        }
    }
    trace!(target: PLAYER_LOG_TARGET, "Time update: {:.2}s ({:.1}%)", state.current_time_seconds, state.progress_percent);
    player.broadcast_progress();
}

#[instrument(skip(player))]
pub fn handle_loaded_metadata(player: &mut PlaybackController, duration: f64) {
    let state = &mut player.state;
    state.is_loading = false;
    match positive(Some(duration)) {
        Some(duration) => {
            info!(target: PLAYER_LOG_TARGET, "Metadata loaded, duration {:.2}s.", duration);
            state.duration_seconds = duration;
            state.metadata_loaded = true;
            state.current_time_seconds = state.current_time_seconds.min(duration);
        }
        None => {
            // Live or broken sources report NaN/Infinity/0.
            warn!(target: PLAYER_LOG_TARGET, "Metadata reported unusable duration {}.", duration);
            state.duration_seconds = 0.0;
            state.metadata_loaded = false;
        }
    }
    let duration_seconds = state.duration_seconds;
    player.broadcast_update(PlayerStateUpdate::MetadataLoaded { duration_seconds });
}

/// Rewinds to the start. Never advances to the next episode.
#[instrument(skip(player))]
pub fn handle_ended(player: &mut PlaybackController) {
    let episode_id = player.state.selected_episode_id;
    info!(target: PLAYER_LOG_TARGET, "Episode {} ended.", episode_id);
    player.state.rewind();
    player.broadcast_update(PlayerStateUpdate::Ended { episode_id });
    player.broadcast_progress();
}

#[instrument(skip(player))]
pub fn handle_fullscreen_change(player: &mut PlaybackController, is_fullscreen: bool) {
    if player.state.is_fullscreen == is_fullscreen {
        return;
    }
    debug!(target: PLAYER_LOG_TARGET, "Fullscreen is now {}.", is_fullscreen);
    player.state.is_fullscreen = is_fullscreen;
    player.broadcast_update(PlayerStateUpdate::FullscreenChanged(is_fullscreen));
}

#[instrument(skip(player))]
pub fn handle_error(player: &mut PlaybackController, message: &str) {
    let episode_id = player.state.selected_episode_id;
    warn!(target: PLAYER_LOG_TARGET, "Playback error on episode {}: {}", episode_id, message);
    let state = &mut player.state;
    state.is_playing = false;
    state.is_loading = false;
    state.error = Some(PlaybackError {
        episode_id,
        message: message.to_string(),
    });
    player.broadcast_update(PlayerStateUpdate::Error(message.to_string()));
}
