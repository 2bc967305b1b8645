use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, PartialEq, Eq, Clone, Debug)]
pub enum CommandError {
    #[error("unrecognized {family} command: {literal:?}")]
    Unrecognized { family: &'static str, literal: String },
}

#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClawCommand {
    Open,
    Close,
}

#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiftCommand {
    Up,
    Down,
}

/// Literals are matched exactly; "Open" or " open" are rejected.
impl FromStr for ClawCommand {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(ClawCommand::Open),
            "close" => Ok(ClawCommand::Close),
            other => Err(CommandError::Unrecognized { family: "claw", literal: other.to_owned() }),
        }
    }
}

impl FromStr for LiftCommand {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(LiftCommand::Up),
            "down" => Ok(LiftCommand::Down),
            other => Err(CommandError::Unrecognized { family: "lift", literal: other.to_owned() }),
        }
    }
}

impl fmt::Display for ClawCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ClawCommand::Open => "open",
            ClawCommand::Close => "close",
        })
    }
}

impl fmt::Display for LiftCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LiftCommand::Up => "up",
            LiftCommand::Down => "down",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_literals() {
        assert_eq!("open".parse::<ClawCommand>(), Ok(ClawCommand::Open));
        assert_eq!("close".parse::<ClawCommand>(), Ok(ClawCommand::Close));
        assert_eq!("up".parse::<LiftCommand>(), Ok(LiftCommand::Up));
        assert_eq!("down".parse::<LiftCommand>(), Ok(LiftCommand::Down));
    }

    #[test]
    fn rejects_wrong_case_and_foreign_family() {
        assert!("Open".parse::<ClawCommand>().is_err());
        assert!("up".parse::<ClawCommand>().is_err());
        assert!("close".parse::<LiftCommand>().is_err());
        let err = "sideways".parse::<LiftCommand>().unwrap_err();
        assert_eq!(err.to_string(), "unrecognized lift command: \"sideways\"");
    }

    #[test]
    fn display_round_trips_through_parse() {
        for command in [ClawCommand::Open, ClawCommand::Close] {
            assert_eq!(command.to_string().parse::<ClawCommand>(), Ok(command));
        }
        for command in [LiftCommand::Up, LiftCommand::Down] {
            assert_eq!(command.to_string().parse::<LiftCommand>(), Ok(command));
        }
    }
}
