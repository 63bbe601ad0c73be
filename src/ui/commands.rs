//! Parsing of interactive input lines

use thiserror::Error;

use crate::catalog::EpisodeId;
use crate::player::PlayerCommand;

/// What the user asked for on one input line.
#[derive(Debug)]
pub enum UserInput {
    /// Forwarded to the player run loop.
    Control(PlayerCommand),
    ShowState,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandParseError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command: {0}")]
    Unknown(String),
    #[error("Command '{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error("Invalid argument for '{command}': {value}")]
    InvalidArgument { command: &'static str, value: String },
}

fn argument<'a>(command: &'static str, arg: Option<&'a str>) -> Result<&'a str, CommandParseError> {
    arg.ok_or(CommandParseError::MissingArgument(command))
}

fn number<T: std::str::FromStr>(command: &'static str, arg: Option<&str>) -> Result<T, CommandParseError> {
    let value = argument(command, arg)?;
    value.parse::<T>().map_err(|_| CommandParseError::InvalidArgument {
        command,
        value: value.to_string(),
    })
}

fn finite(command: &'static str, arg: Option<&str>) -> Result<f64, CommandParseError> {
    let value: f64 = number(command, arg)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CommandParseError::InvalidArgument {
            command,
            value: value.to_string(),
        })
    }
}

/// Parses one input line.
pub fn parse_command(line: &str) -> Result<UserInput, CommandParseError> {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Err(CommandParseError::Empty);
    };
    let arg = words.next();

    let input = match name.to_lowercase().as_str() {
        "p" | "play" | "pause" | "toggle" => UserInput::Control(PlayerCommand::TogglePlay),
        "seek" => UserInput::Control(PlayerCommand::SeekTo(finite("seek", arg)?)),
        "click" => UserInput::Control(PlayerCommand::SeekFromClick(finite("click", arg)?)),
        "vol" | "volume" => {
            let level: u8 = number("vol", arg)?;
            if level > 100 {
                return Err(CommandParseError::InvalidArgument {
                    command: "vol",
                    value: level.to_string(),
                });
            }
            UserInput::Control(PlayerCommand::SetVolume(level))
        }
        "mute" | "m" => UserInput::Control(PlayerCommand::ToggleMute),
        "fs" | "fullscreen" => UserInput::Control(PlayerCommand::ToggleFullscreen),
        "ep" | "episode" => {
            let id: EpisodeId = number("ep", arg)?;
            UserInput::Control(PlayerCommand::SelectEpisode(id))
        }
        "list" | "l" => UserInput::Control(PlayerCommand::ToggleEpisodeList),
        "controls" => match argument("controls", arg)? {
            "on" | "show" => UserInput::Control(PlayerCommand::SetControlsVisible(true)),
            "off" | "hide" => UserInput::Control(PlayerCommand::SetControlsVisible(false)),
            other => {
                return Err(CommandParseError::InvalidArgument {
                    command: "controls",
                    value: other.to_string(),
                })
            }
        },
        "state" | "s" => UserInput::ShowState,
        "help" | "h" | "?" => UserInput::Help,
        "quit" | "q" | "exit" => UserInput::Quit,
        other => return Err(CommandParseError::Unknown(other.to_string())),
    };
    Ok(input)
}
