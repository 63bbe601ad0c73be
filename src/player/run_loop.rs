use super::{PlaybackController, PlayerCommand, PlayerStateUpdate, PLAYER_LOG_TARGET};
use crate::media::SourceEvent;
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

/// Feeds user commands and media events into the controller, one at a time.
pub async fn run_player_loop(
    player: &mut PlaybackController,
    mut commands: mpsc::Receiver<PlayerCommand>,
    mut events: mpsc::UnboundedReceiver<SourceEvent>,
) {
    info!(target: PLAYER_LOG_TARGET, "Player run loop started.");

    loop {
        tokio::select! {
            biased; // Commands first

            Some(command) = commands.recv() => {
                trace!(target: PLAYER_LOG_TARGET, "Received command: {:?}", command);
                match command {
                    PlayerCommand::TogglePlay => player.toggle_play(),
                    PlayerCommand::SeekTo(percent) => player.seek_to(percent),
                    PlayerCommand::SeekFromClick(ratio) => player.seek_from_click_position(ratio),
                    PlayerCommand::SetVolume(level) => player.set_volume(level),
                    PlayerCommand::ToggleMute => player.toggle_mute(),
                    PlayerCommand::ToggleFullscreen => player.toggle_fullscreen(),
                    PlayerCommand::SelectEpisode(id) => {
                        if let Err(e) = player.select_episode(id) {
                            warn!(target: PLAYER_LOG_TARGET, "SelectEpisode failed: {}", e);
                            player.broadcast_update(PlayerStateUpdate::Error(e.to_string()));
                        }
                    }
                    PlayerCommand::ToggleEpisodeList => player.toggle_episode_list(),
                    PlayerCommand::SetControlsVisible(visible) => player.set_controls_visible(visible),
                    PlayerCommand::GetState(responder) => {
                        // Ignore error if receiver dropped
                        let _ = responder.send(player.state().clone());
                    }
                    PlayerCommand::Shutdown => {
                        info!(target: PLAYER_LOG_TARGET, "Shutdown command received. Exiting run loop.");
                        break;
                    }
                }
            }

            Some(event) = events.recv() => player.handle_source_event(event),

            else => {
                debug!(target: PLAYER_LOG_TARGET, "Command and event channels closed. Exiting run loop.");
                break;
            }
        }
    }

    if player.state().is_playing {
        if let Err(e) = player.media.pause() {
            warn!(target: PLAYER_LOG_TARGET, "Pause on shutdown failed: {}", e);
        }
        player.state.is_playing = false;
    }
    info!(target: PLAYER_LOG_TARGET, "Player run loop finished.");
}
