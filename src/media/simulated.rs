//! Headless media element.
//!
//! Keeps a timeline in shared memory and reports changes the same way a real
//! element would: through [`MediaEvent`]s on a channel. A [`SimulatedClock`]
//! advances the timeline while playing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration as StdDuration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, info, trace, warn};
use url::Url;

use super::{LoadGeneration, MediaElement, MediaError, MediaEvent, SourceEvent};

const LOG_TARGET: &str = "r_episode_player::media::simulated";

/// Duration reported for sources missing from the duration table.
pub const DEFAULT_DURATION_SECS: f64 = 60.0;

const SUPPORTED_SCHEMES: [&str; 3] = ["http", "https", "file"];

/// Current state of the simulated element.
#[derive(Debug, Default, Clone)]
pub struct Timeline {
    pub source: Option<String>,
    /// Bumped by every `load`.
    pub generation: LoadGeneration,
    pub duration: Option<f64>,
    pub position: f64,
    pub playing: bool,
    pub volume: f64,
    pub muted: bool,
    pub fullscreen: bool,
}

type SharedTimeline = Arc<Mutex<Timeline>>;

fn lock(timeline: &SharedTimeline) -> MutexGuard<'_, Timeline> {
    timeline.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Media element without a decoder; time advances only when the clock ticks.
pub struct SimulatedMedia {
    timeline: SharedTimeline,
    durations: HashMap<String, f64>,
    events: mpsc::UnboundedSender<SourceEvent>,
}

impl SimulatedMedia {
    /// Creates the element and the receiver its events are delivered to.
    /// `durations` maps source URLs to their length in seconds.
    pub fn new(durations: HashMap<String, f64>) -> (Self, mpsc::UnboundedReceiver<SourceEvent>) {
        let (events, event_rx) = mpsc::unbounded_channel();
        let media = SimulatedMedia {
            timeline: Arc::new(Mutex::new(Timeline {
                volume: 1.0,
                ..Timeline::default()
            })),
            durations,
            events,
        };
        (media, event_rx)
    }

    /// Returns a clock driving this element's timeline.
    pub fn clock(&self) -> SimulatedClock {
        SimulatedClock {
            timeline: Arc::clone(&self.timeline),
            events: self.events.clone(),
        }
    }

    /// Snapshot of the timeline, mainly for inspection in tests.
    pub fn timeline(&self) -> Timeline {
        lock(&self.timeline).clone()
    }

    fn emit(&self, event: MediaEvent) {
        let generation = lock(&self.timeline).generation;
        trace!(target: LOG_TARGET, generation, "Emitting {:?}", event);
        if self.events.send(SourceEvent { generation, event }).is_err() {
            debug!(target: LOG_TARGET, "No listener for media events.");
        }
    }
}

impl MediaElement for SimulatedMedia {
    fn load(&mut self, url: &str) -> Result<LoadGeneration, MediaError> {
        let generation = {
            let mut timeline = lock(&self.timeline);
            timeline.generation += 1;
            timeline.source = Some(url.to_string());
            timeline.duration = None;
            timeline.position = 0.0;
            timeline.playing = false;
            timeline.generation
        };

        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(target: LOG_TARGET, "Cannot load {}: {}", url, e);
                self.emit(MediaEvent::Error(format!("invalid source URL {}: {}", url, e)));
                return Ok(generation);
            }
        };
        if !SUPPORTED_SCHEMES.contains(&parsed.scheme()) {
            warn!(target: LOG_TARGET, "Unsupported scheme for {}", url);
            self.emit(MediaEvent::Error(format!("unsupported scheme: {}", parsed.scheme())));
            return Ok(generation);
        }

        let duration = self.durations.get(url).copied().unwrap_or(DEFAULT_DURATION_SECS);
        lock(&self.timeline).duration = Some(duration);
        info!(target: LOG_TARGET, "Loaded {} ({:.1}s)", url, duration);
        self.emit(MediaEvent::LoadedMetadata { duration });
        Ok(generation)
    }

    fn play(&mut self) -> Result<(), MediaError> {
        let mut timeline = lock(&self.timeline);
        let Some(duration) = timeline.duration else {
            return Err(MediaError::NoSource);
        };
        // Ended media starts over.
        if timeline.position >= duration {
            timeline.position = 0.0;
        }
        timeline.playing = true;
        Ok(())
    }

    fn pause(&mut self) -> Result<(), MediaError> {
        lock(&self.timeline).playing = false;
        Ok(())
    }

    fn set_current_time(&mut self, seconds: f64) -> Result<(), MediaError> {
        let (current_time, duration) = {
            let mut timeline = lock(&self.timeline);
            let upper = timeline.duration.ok_or(MediaError::NoSource)?;
            timeline.position = seconds.clamp(0.0, upper);
            (timeline.position, timeline.duration)
        };
        self.emit(MediaEvent::TimeUpdate { current_time, duration });
        Ok(())
    }

    fn set_volume(&mut self, volume: f64) -> Result<(), MediaError> {
        lock(&self.timeline).volume = volume.clamp(0.0, 1.0);
        Ok(())
    }

    fn set_muted(&mut self, muted: bool) -> Result<(), MediaError> {
        lock(&self.timeline).muted = muted;
        Ok(())
    }

    fn request_fullscreen(&mut self) -> Result<(), MediaError> {
        lock(&self.timeline).fullscreen = true;
        self.emit(MediaEvent::FullscreenChange(true));
        Ok(())
    }

    fn exit_fullscreen(&mut self) -> Result<(), MediaError> {
        lock(&self.timeline).fullscreen = false;
        self.emit(MediaEvent::FullscreenChange(false));
        Ok(())
    }
}

/// Advances a [`SimulatedMedia`] timeline in real time.
#[derive(Clone)]
pub struct SimulatedClock {
    timeline: SharedTimeline,
    events: mpsc::UnboundedSender<SourceEvent>,
}

impl SimulatedClock {
    /// Moves the playhead forward by `elapsed` if playing. Returns `false`
    /// once nobody listens for events anymore.
    pub fn tick(&self, elapsed: StdDuration) -> bool {
        let mut pending = Vec::with_capacity(2);
        {
            let mut timeline = lock(&self.timeline);
            let duration = match timeline.duration {
                Some(duration) if timeline.playing => duration,
                _ => return !self.events.is_closed(),
            };
            let generation = timeline.generation;
            timeline.position = (timeline.position + elapsed.as_secs_f64()).min(duration);
            pending.push(SourceEvent {
                generation,
                event: MediaEvent::TimeUpdate {
                    current_time: timeline.position,
                    duration: Some(duration),
                },
            });
            if timeline.position >= duration {
                timeline.playing = false;
                pending.push(SourceEvent {
                    generation,
                    event: MediaEvent::Ended,
                });
            }
        }

        pending.into_iter().all(|event| self.events.send(event).is_ok())
    }

    /// Spawns a task ticking every `period` until the event receiver is dropped.
    pub fn spawn(self, period: StdDuration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if !self.tick(period) {
                    debug!(target: LOG_TARGET, "Event receiver closed, stopping clock.");
                    break;
                }
            }
        })
    }
}
