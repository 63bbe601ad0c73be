//! Configuration loading, validation and persistence

mod settings;

pub use settings::*;
