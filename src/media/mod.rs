//! Media resource contract and the headless element used by the CLI

mod element;
mod error;
pub mod simulated;

pub use element::{LoadGeneration, MediaElement, MediaEvent, SourceEvent};
pub use error::MediaError;
pub use simulated::{SimulatedClock, SimulatedMedia};
