//! Now-playing line and progress bar

use indicatif::{ProgressBar, ProgressStyle};

use crate::catalog::Episode;
use crate::player::{format_time, PlaybackState};

const BAR_TEMPLATE: &str = "{prefix} [{bar:40.magenta/white}] {msg}";

/// Formats the now-playing line shown under the progress bar.
pub fn status_line(state: &PlaybackState, episode: Option<&Episode>) -> String {
    let play = if state.is_playing { "[playing]" } else { "[paused]" };
    let title = episode.map(|ep| ep.to_string()).unwrap_or_else(|| format!("#{}", state.selected_episode_id));
    // The previous episode's duration is kept until the new metadata arrives.
    let total = if state.metadata_loaded && state.duration_seconds > 0.0 {
        format_time(state.duration_seconds)
    } else {
        format_time(f64::NAN)
    };

    let mut line = format!(
        "{} {}  {} / {}  vol {}%",
        play,
        title,
        format_time(state.current_time_seconds),
        total,
        state.volume
    );
    if state.is_muted {
        line.push_str(" (muted)");
    }
    if state.is_fullscreen {
        line.push_str(" [fullscreen]");
    }
    if state.is_loading {
        line.push_str(" loading...");
    }
    if let Some(error) = &state.error {
        line.push_str(&format!(" error: {}", error.message));
    }
    line
}

/// Terminal progress bar tracking the current episode.
pub struct StatusDisplay {
    bar: ProgressBar,
}

impl StatusDisplay {
    pub fn new() -> Self {
        let bar = ProgressBar::new(100);
        let style = ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        bar.set_style(style);
        StatusDisplay { bar }
    }

    /// A display that renders nothing, for non-interactive runs.
    pub fn hidden() -> Self {
        StatusDisplay {
            bar: ProgressBar::hidden(),
        }
    }

    /// Redraws the bar from the state. The bar is measured in tenths of a percent.
    pub fn render(&self, state: &PlaybackState, episode: Option<&Episode>) {
        self.bar.set_length(1000);
        self.bar.set_position((state.progress_percent.clamp(0.0, 100.0) * 10.0).round() as u64);
        self.bar.set_prefix(if state.is_playing { ">" } else { "||" });
        self.bar.set_message(status_line(state, episode));
    }

    /// Prints a line above the bar without tearing it.
    pub fn println(&self, message: impl AsRef<str>) {
        self.bar.println(message);
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for StatusDisplay {
    fn default() -> Self {
        Self::new()
    }
}
