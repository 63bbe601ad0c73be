//! Command-line interface implementation

use clap::Parser;
use std::error::Error;

use crate::catalog::{EpisodeId, EpisodeList};

/// Command-line arguments for r-episode-player
#[derive(Parser, Debug)]
#[command(author, version, about = "Terminal episode player", long_about = None)]
pub struct Args {
    /// Config file path
    #[arg(short, long, env = "EPISODE_PLAYER_CONFIG")]
    pub config: Option<String>,

    /// JSON file with the episode list, or the URL of a single video
    /// (overrides the config file)
    #[arg(short, long, env = "EPISODE_PLAYER_EPISODES")]
    pub episodes: Option<String>,

    /// Episode id to load first
    #[arg(long = "episode")]
    pub initial_episode: Option<EpisodeId>,

    /// Initial volume, 0-100
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub volume: Option<u8>,

    /// Position report interval of the simulated player, in milliseconds
    #[arg(long = "tick-ms", env = "EPISODE_PLAYER_TICK_MS")]
    pub tick_ms: Option<u64>,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// CLI user interface for interacting with the player
pub struct Cli {
    pub args: Args,
}

impl Default for Cli {
    fn default() -> Self {
        Self::new()
    }
}

impl Cli {
    /// Create a new CLI instance
    pub fn new() -> Self {
        Cli {
            args: Args::parse(),
        }
    }

    /// Display the episode list, marking the selected entry
    pub fn display_episodes(&self, episodes: &EpisodeList, selected: EpisodeId) {
        println!("\nEpisodes:");
        for line in episode_lines(episodes, selected) {
            println!("{}", line);
        }
        println!();
    }

    /// Display the available commands
    pub fn display_help(&self) {
        println!("Commands:");
        println!("  play | pause | p     toggle playback");
        println!("  seek <percent>       jump to a position (0-100)");
        println!("  click <ratio>        click on the progress bar (0.0-1.0)");
        println!("  vol <level>          set volume (0-100)");
        println!("  mute                 toggle mute");
        println!("  fs                   toggle fullscreen");
        println!("  ep <id>              switch episode");
        println!("  list                 show or hide the episode list");
        println!("  controls on|off      show or hide the controls");
        println!("  state                print the playback state as JSON");
        println!("  quit | q             exit");
    }

    /// Display error messages
    pub fn display_error(&self, error: &dyn Error) {
        eprintln!("Error: {}", error);
    }
}

/// One line per episode, `>` marking the selected one.
pub fn episode_lines(episodes: &EpisodeList, selected: EpisodeId) -> Vec<String> {
    episodes
        .iter()
        .map(|ep| {
            let marker = if ep.id == selected { ">" } else { " " };
            let title = if ep.title.chars().count() > 40 {
                format!("{:.37}...", ep.title)
            } else {
                ep.title.clone()
            };
            format!("{} {:<5} {:<8} {:<40} {}", marker, ep.id, ep.label, title, ep.duration)
        })
        .collect()
}
