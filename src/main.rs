use r_episode_player::catalog::{self, EpisodeId, EpisodeList};
use r_episode_player::config::Settings;
use r_episode_player::init_app_dirs;
use r_episode_player::media::SimulatedMedia;
use r_episode_player::player::{
    ControllerOptions, PlaybackController, PlaybackState, PlayerCommand, PlayerStateUpdate,
};
use r_episode_player::ui::{episode_lines, parse_command, Cli, CommandParseError, StatusDisplay, UserInput};
use std::collections::HashMap;
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const LOG_TARGET: &str = "r_episode_player::main";

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Asks the run loop for a snapshot of the playback state.
async fn fetch_state(commands: &mpsc::Sender<PlayerCommand>) -> Option<PlaybackState> {
    let (tx, rx) = oneshot::channel();
    commands.send(PlayerCommand::GetState(tx)).await.ok()?;
    rx.await.ok()
}

/// Redraws the status display whenever the controller reports a change.
async fn render_updates(
    mut updates: broadcast::Receiver<PlayerStateUpdate>,
    commands: mpsc::Sender<PlayerCommand>,
    display: Arc<StatusDisplay>,
    episodes: EpisodeList,
) {
    loop {
        let update = updates.recv().await;
        let list_opened = matches!(update, Ok(PlayerStateUpdate::EpisodeListToggled(true)));
        match update {
            Ok(PlayerStateUpdate::Error(message)) => display.println(format!("Error: {}", message)),
            Ok(PlayerStateUpdate::EpisodeSelected { episode_id }) => {
                if let Some(episode) = episodes.find(episode_id) {
                    display.println(format!("Now playing: {}", episode));
                }
            }
            Ok(PlayerStateUpdate::Ended { .. }) => display.println("Playback finished."),
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                debug!(target: LOG_TARGET, "Renderer skipped {} updates.", skipped);
            }
            Err(RecvError::Closed) => break,
        }

        let Some(state) = fetch_state(&commands).await else {
            break;
        };
        if list_opened {
            for line in episode_lines(&episodes, state.selected_episode_id) {
                display.println(line);
            }
        }
        display.render(&state, episodes.find(state.selected_episode_id));
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::new();
    let args = &cli.args;
    init_tracing(args.verbose);

    init_app_dirs()?;

    let config_path = match &args.config {
        Some(path) => PathBuf::from(path),
        None => Settings::default_path(),
    };
    let mut settings = Settings::load(&config_path)?;

    // Command-line arguments override the config file
    if let Some(volume) = args.volume {
        settings.initial_volume = volume;
    }
    if let Some(tick_ms) = args.tick_ms {
        settings.tick_interval_ms = tick_ms;
    }
    if args.episodes.is_some() {
        settings.episodes_file = args.episodes.clone();
    }
    settings.validate()?;

    let episodes = match &settings.episodes_file {
        Some(source) => catalog::load_source(source)?,
        None => EpisodeList::default(),
    };
    let options = ControllerOptions::from(&settings);

    let durations: HashMap<String, f64> = episodes
        .iter()
        .chain(options.fallback_episodes.iter())
        .filter_map(|ep| Some((ep.source_url.clone(), ep.display_duration_seconds()?)))
        .collect();
    let (media, event_rx) = SimulatedMedia::new(durations);
    let clock = media.clock();

    let mut controller = PlaybackController::new(episodes, args.initial_episode, options, Box::new(media))?;
    controller.set_on_episode_select(Box::new(|id: EpisodeId| {
        info!(target: LOG_TARGET, "Episode {} selected.", id);
    }));

    let episodes = controller.episodes().clone();
    let display = Arc::new(StatusDisplay::new());
    if let Some(episode) = controller.current_episode() {
        display.println(format!("Poster: {}", episode.poster_url(&settings.image_base_url)));
    }
    cli.display_episodes(&episodes, controller.state().selected_episode_id);
    cli.display_help();

    let (command_tx, command_rx) = mpsc::channel(32);
    let updates = controller.subscribe_state_updates();
    let clock_task = clock.spawn(Duration::from_millis(settings.tick_interval_ms));
    let renderer_task = tokio::spawn(render_updates(
        updates,
        command_tx.clone(),
        Arc::clone(&display),
        episodes,
    ));
    let player_task = tokio::spawn(async move {
        controller.run(command_rx, event_rx).await;
        controller
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Ok(UserInput::Control(command)) => {
                if command_tx.send(command).await.is_err() {
                    break;
                }
            }
            Ok(UserInput::ShowState) => {
                if let Some(state) = fetch_state(&command_tx).await {
                    display.println(serde_json::to_string_pretty(&state)?);
                }
            }
            Ok(UserInput::Help) => cli.display_help(),
            Ok(UserInput::Quit) => break,
            Err(CommandParseError::Empty) => {}
            Err(e) => cli.display_error(&e),
        }
    }

    // The loop may already be gone if the channel closed.
    let _ = command_tx.send(PlayerCommand::Shutdown).await;
    let controller = player_task.await?;
    renderer_task.abort();
    clock_task.abort();
    display.finish();

    info!(
        target: LOG_TARGET,
        "Stopped on episode {} at {:.1}s.",
        controller.state().selected_episode_id,
        controller.state().current_time_seconds
    );
    Ok(())
}
