//! Terminal front-end: arguments, input parsing and status rendering

mod cli;
mod commands;
mod status;

pub use cli::{episode_lines, Args, Cli};
pub use commands::{parse_command, CommandParseError, UserInput};
pub use status::{status_line, StatusDisplay};
