use super::{PlaybackController, PlayerError, PlayerStateUpdate, UnknownEpisodePolicy, PLAYER_LOG_TARGET};
use crate::catalog::EpisodeId;
use tracing::{debug, info, instrument, warn};

#[instrument(skip(player), fields(is_playing = player.state.is_playing))]
pub fn handle_toggle_play(player: &mut PlaybackController) {
    let episode_id = player.state.selected_episode_id;
    if player.state.is_playing {
        info!(target: PLAYER_LOG_TARGET, "Pausing episode {}.", episode_id);
        if let Err(e) = player.media.pause() {
            warn!(target: PLAYER_LOG_TARGET, "Pause request failed: {}", e);
        }
        player.state.is_playing = false;
        player.broadcast_update(PlayerStateUpdate::Paused { episode_id });
    } else {
        info!(target: PLAYER_LOG_TARGET, "Requesting playback of episode {}.", episode_id);
        // The state follows the request; the element's answer is not awaited.
        if let Err(e) = player.media.play() {
            warn!(target: PLAYER_LOG_TARGET, "Play request failed: {}", e);
        }
        player.state.is_playing = true;
        player.broadcast_update(PlayerStateUpdate::Playing { episode_id });
    }
}

#[instrument(skip(player))]
pub fn handle_seek_to(player: &mut PlaybackController, percent: f64) {
    let Some(duration) = player.state.known_duration() else {
        debug!(target: PLAYER_LOG_TARGET, "Seek ignored: duration unknown.");
        return;
    };
    if percent.is_nan() {
        warn!(target: PLAYER_LOG_TARGET, "Seek ignored: target is NaN.");
        return;
    }

    let percent = percent.clamp(0.0, 100.0);
    let target_seconds = percent / 100.0 * duration;
    debug!(target: PLAYER_LOG_TARGET, "Seeking to {:.2}s ({:.1}%).", target_seconds, percent);

    player.state.pending_seek_seconds = Some(target_seconds);
    player.state.progress_percent = percent;
    if let Err(e) = player.media.set_current_time(target_seconds) {
        warn!(target: PLAYER_LOG_TARGET, "Seek request failed: {}", e);
    }
    player.broadcast_progress();
}

#[instrument(skip(player))]
pub fn handle_set_volume(player: &mut PlaybackController, level: u8) {
    let level = level.min(100);
    if let Err(e) = player.media.set_volume(f64::from(level) / 100.0) {
        warn!(target: PLAYER_LOG_TARGET, "Volume request failed: {}", e);
    }
    player.state.volume = level;
    player.state.is_muted = level == 0;
    player.broadcast_update(PlayerStateUpdate::VolumeChanged {
        volume: level,
        is_muted: player.state.is_muted,
    });
}

/// Flips the mute flag. The volume level is left as is, so unmuting after
/// dragging the slider to zero stays silent.
#[instrument(skip(player), fields(is_muted = player.state.is_muted))]
pub fn handle_toggle_mute(player: &mut PlaybackController) {
    let muted = !player.state.is_muted;
    if let Err(e) = player.media.set_muted(muted) {
        warn!(target: PLAYER_LOG_TARGET, "Mute request failed: {}", e);
    }
    player.state.is_muted = muted;
    player.broadcast_update(PlayerStateUpdate::VolumeChanged {
        volume: player.state.volume,
        is_muted: muted,
    });
}

/// Requests or exits fullscreen. `is_fullscreen` changes only when the
/// platform reports it.
#[instrument(skip(player), fields(is_fullscreen = player.state.is_fullscreen))]
pub fn handle_toggle_fullscreen(player: &mut PlaybackController) {
    let result = if player.state.is_fullscreen {
        player.media.exit_fullscreen()
    } else {
        player.media.request_fullscreen()
    };
    if let Err(e) = result {
        warn!(target: PLAYER_LOG_TARGET, "Fullscreen request failed: {}", e);
    }
}

#[instrument(skip(player), fields(current = player.state.selected_episode_id))]
pub fn handle_select_episode(player: &mut PlaybackController, id: EpisodeId) -> Result<(), PlayerError> {
    let target = match player.episodes.find(id) {
        Some(episode) => episode.id,
        None => match player.unknown_episode_policy {
            UnknownEpisodePolicy::Reject => {
                warn!(target: PLAYER_LOG_TARGET, "Rejecting unknown episode {}.", id);
                return Err(PlayerError::UnknownEpisode(id));
            }
            UnknownEpisodePolicy::FallbackToFirst => {
                let first = player.episodes.first().map(|ep| ep.id).ok_or(PlayerError::UnknownEpisode(id))?;
                info!(target: PLAYER_LOG_TARGET, "Unknown episode {}, falling back to {}.", id, first);
                first
            }
        },
    };

    if target == player.state.selected_episode_id {
        debug!(target: PLAYER_LOG_TARGET, "Episode {} already selected.", target);
        return Ok(());
    }

    info!(target: PLAYER_LOG_TARGET, "Switching to episode {}.", target);
    player.state.selected_episode_id = target;
    player.state.rewind();
    player.load_selected();

    if let Some(callback) = player.on_episode_select.as_mut() {
        callback(target);
    }
    player.broadcast_update(PlayerStateUpdate::EpisodeSelected { episode_id: target });
    player.broadcast_progress();
    Ok(())
}
