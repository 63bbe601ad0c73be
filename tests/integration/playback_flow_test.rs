//! Integration tests driving the controller against the simulated media element

use crate::test_utils::episode;
use r_episode_player::catalog::EpisodeList;
use r_episode_player::media::{SimulatedMedia, SourceEvent};
use r_episode_player::player::{ControllerOptions, PlaybackController, PlayerCommand, PlayerStateUpdate};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::mpsc::UnboundedReceiver;

fn durations_for(episodes: &EpisodeList) -> HashMap<String, f64> {
    episodes
        .iter()
        .filter_map(|ep| Some((ep.source_url.clone(), ep.display_duration_seconds()?)))
        .collect()
}

fn setup(episodes: EpisodeList) -> (PlaybackController, UnboundedReceiver<SourceEvent>) {
    let (media, events) = SimulatedMedia::new(durations_for(&episodes));
    let controller = PlaybackController::new(episodes, None, ControllerOptions::default(), Box::new(media)).unwrap();
    (controller, events)
}

/// Waits for the first update matching `wanted`, skipping the others.
async fn wait_for<F>(updates: &mut broadcast::Receiver<PlayerStateUpdate>, wanted: F) -> PlayerStateUpdate
where
    F: Fn(&PlayerStateUpdate) -> bool,
{
    loop {
        match updates.recv().await {
            Ok(update) if wanted(&update) => return update,
            Ok(_) | Err(RecvError::Lagged(_)) => {}
            Err(RecvError::Closed) => panic!("controller stopped broadcasting"),
        }
    }
}

/// Delivers every queued media event to the controller.
fn pump(controller: &mut PlaybackController, events: &mut UnboundedReceiver<SourceEvent>) {
    while let Ok(event) = events.try_recv() {
        controller.handle_source_event(event);
    }
}

#[cfg(test)]
mod playback_flow_tests {
    use super::*;

    #[test]
    fn test_metadata_then_seek_then_play_to_end() {
        let episodes = EpisodeList::new(vec![episode(1, "0:10"), episode(2, "0:20")]);
        let (media, mut events) = SimulatedMedia::new(durations_for(&episodes));
        let clock = media.clock();
        let mut controller =
            PlaybackController::new(episodes, None, ControllerOptions::default(), Box::new(media)).unwrap();

        assert_eq!(controller.state().duration_seconds, 0.0);
        pump(&mut controller, &mut events);
        assert_eq!(controller.state().duration_seconds, 10.0);
        assert!(!controller.state().is_loading);

        controller.seek_to(50.0);
        assert_eq!(controller.state().progress_percent, 50.0);
        pump(&mut controller, &mut events);
        assert_eq!(controller.state().current_time_seconds, 5.0);
        assert_eq!(controller.state().pending_seek_seconds, None);

        controller.toggle_play();
        clock.tick(Duration::from_secs(2));
        pump(&mut controller, &mut events);
        assert_eq!(controller.state().current_time_seconds, 7.0);
        assert!((controller.state().progress_percent - 70.0).abs() < 1e-9);

        clock.tick(Duration::from_secs(5));
        pump(&mut controller, &mut events);
        let state = controller.state();
        assert!(!state.is_playing);
        assert_eq!(state.current_time_seconds, 0.0);
        assert_eq!(state.progress_percent, 0.0);
        assert_eq!(state.selected_episode_id, 1, "no auto-advance");
    }

    #[test]
    fn test_episode_switch_reloads_and_reports_new_duration() {
        let (mut controller, mut events) = setup(EpisodeList::new(vec![episode(1, "0:10"), episode(2, "1:00")]));
        pump(&mut controller, &mut events);
        controller.set_volume(20);
        controller.toggle_play();

        controller.select_episode(2).unwrap();
        assert!(!controller.state().is_playing);
        assert!(controller.state().is_loading);
        assert_eq!(controller.state().duration_seconds, 10.0);

        pump(&mut controller, &mut events);
        assert_eq!(controller.state().duration_seconds, 60.0);
        assert_eq!(controller.state().volume, 20);
    }

    #[test]
    fn test_fullscreen_round_trip_through_platform_signal() {
        let (mut controller, mut events) = setup(EpisodeList::new(vec![episode(1, "0:10")]));
        pump(&mut controller, &mut events);

        controller.toggle_fullscreen();
        assert!(!controller.state().is_fullscreen);
        pump(&mut controller, &mut events);
        assert!(controller.state().is_fullscreen);

        controller.toggle_fullscreen();
        pump(&mut controller, &mut events);
        assert!(!controller.state().is_fullscreen);
    }

    #[test]
    fn test_bad_source_surfaces_playback_error() {
        let mut broken = episode(1, "0:10");
        broken.source_url = "rtmp://live.example.com/stream".to_string();
        let (mut controller, mut events) = setup(EpisodeList::new(vec![broken, episode(2, "0:10")]));
        pump(&mut controller, &mut events);

        let error = controller.state().error.clone().unwrap();
        assert_eq!(error.episode_id, 1);
        assert!(error.message.contains("rtmp"));
        assert!(!controller.state().is_loading);

        controller.select_episode(2).unwrap();
        pump(&mut controller, &mut events);
        assert!(controller.state().error.is_none());
        assert_eq!(controller.state().duration_seconds, 10.0);
    }

    #[tokio::test]
    async fn test_run_loop_with_simulated_clock() {
        let episodes = EpisodeList::new(vec![episode(1, "0:30"), episode(2, "0:40")]);
        let (media, events) = SimulatedMedia::new(durations_for(&episodes));
        let clock = media.clock();
        let mut controller =
            PlaybackController::new(episodes, None, ControllerOptions::default(), Box::new(media)).unwrap();
        let mut updates = controller.subscribe_state_updates();

        let (command_tx, command_rx) = tokio::sync::mpsc::channel(16);
        let player = tokio::spawn(async move {
            controller.run(command_rx, events).await;
            controller
        });

        let update = wait_for(&mut updates, |u| matches!(u, PlayerStateUpdate::MetadataLoaded { .. })).await;
        assert_eq!(update, PlayerStateUpdate::MetadataLoaded { duration_seconds: 30.0 });

        command_tx.send(PlayerCommand::TogglePlay).await.unwrap();
        let update = wait_for(&mut updates, |u| matches!(u, PlayerStateUpdate::Playing { .. })).await;
        assert_eq!(update, PlayerStateUpdate::Playing { episode_id: 1 });

        clock.tick(Duration::from_secs(3));
        let update = wait_for(&mut updates, |u| matches!(u, PlayerStateUpdate::Progress { .. })).await;
        assert!(matches!(update, PlayerStateUpdate::Progress { current_time_seconds, .. } if current_time_seconds == 3.0));

        command_tx.send(PlayerCommand::SelectEpisode(2)).await.unwrap();
        command_tx.send(PlayerCommand::Shutdown).await.unwrap();
        let controller = player.await.unwrap();
        let state = controller.state();
        assert_eq!(state.selected_episode_id, 2);
        assert!(!state.is_playing);
        assert_eq!(state.current_time_seconds, 0.0);
    }

    #[test]
    fn test_queued_progress_from_previous_episode_is_discarded() {
        let episodes = EpisodeList::new(vec![episode(1, "1:40"), episode(2, "0:40")]);
        let (media, mut events) = SimulatedMedia::new(durations_for(&episodes));
        let clock = media.clock();
        let mut controller =
            PlaybackController::new(episodes, None, ControllerOptions::default(), Box::new(media)).unwrap();
        pump(&mut controller, &mut events);

        controller.toggle_play();
        clock.tick(Duration::from_secs(50));
        controller.select_episode(2).unwrap();
        pump(&mut controller, &mut events);

        let state = controller.state();
        assert_eq!(state.selected_episode_id, 2);
        assert_eq!(state.current_time_seconds, 0.0);
        assert_eq!(state.progress_percent, 0.0);
        assert_eq!(state.duration_seconds, 40.0);
    }

    #[test]
    fn test_replay_after_end_starts_from_beginning() {
        let episodes = EpisodeList::new(vec![episode(1, "0:01")]);
        let (media, mut events) = SimulatedMedia::new(durations_for(&episodes));
        let clock = media.clock();
        let mut controller =
            PlaybackController::new(episodes, None, ControllerOptions::default(), Box::new(media)).unwrap();
        pump(&mut controller, &mut events);

        controller.toggle_play();
        clock.tick(Duration::from_secs(2));
        pump(&mut controller, &mut events);
        assert!(!controller.state().is_playing);

        controller.toggle_play();
        clock.tick(Duration::from_millis(500));
        pump(&mut controller, &mut events);
        let state = controller.state();
        assert!(state.is_playing, "replay does not end immediately");
        assert_eq!(state.current_time_seconds, 0.5);
        assert_eq!(state.progress_percent, 50.0);
    }

    #[tokio::test]
    async fn test_run_loop_switch_resets_progress() {
        let episodes = EpisodeList::new(vec![episode(1, "1:40"), episode(2, "0:40")]);
        let (media, events) = SimulatedMedia::new(durations_for(&episodes));
        let clock = media.clock();
        let mut controller =
            PlaybackController::new(episodes, None, ControllerOptions::default(), Box::new(media)).unwrap();
        let mut updates = controller.subscribe_state_updates();

        let (command_tx, command_rx) = tokio::sync::mpsc::channel(16);
        let player = tokio::spawn(async move {
            controller.run(command_rx, events).await;
            controller
        });
        wait_for(&mut updates, |u| matches!(u, PlayerStateUpdate::MetadataLoaded { .. })).await;

        command_tx.send(PlayerCommand::TogglePlay).await.unwrap();
        wait_for(&mut updates, |u| matches!(u, PlayerStateUpdate::Playing { .. })).await;
        clock.tick(Duration::from_secs(50));
        command_tx.send(PlayerCommand::SelectEpisode(2)).await.unwrap();
        wait_for(&mut updates, |u| {
            matches!(u, PlayerStateUpdate::MetadataLoaded { duration_seconds } if *duration_seconds == 40.0)
        })
        .await;

        let (tx, rx) = tokio::sync::oneshot::channel();
        command_tx.send(PlayerCommand::GetState(tx)).await.unwrap();
        let state = rx.await.unwrap();
        assert_eq!(state.selected_episode_id, 2);
        assert_eq!(state.current_time_seconds, 0.0);
        assert_eq!(state.progress_percent, 0.0);

        command_tx.send(PlayerCommand::Shutdown).await.unwrap();
        player.await.unwrap();
    }
}
