//! Pure helpers mapping claw commands and button pairs to servo positions.
//!
//! Dual variants exist for claws driven by several servos; every servo receives the same
//! target, there is no per-servo differentiation.

use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::command::{ClawCommand, CommandError};

pub const DEFAULT_OPEN_POSITION: f64 = 1.0;
pub const DEFAULT_CLOSE_POSITION: f64 = 0.0;

/// Servo positions for the two claw states.
#[derive(new, Debug, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub struct ClawPositions {
    pub open: f64,
    pub close: f64,
}

impl ClawPositions {
    /// Reversed claws are mounted mirrored, so open and close swap ends of the servo range.
    pub fn from_reverse(reverse: bool) -> Self {
        if reverse {
            Self::new(DEFAULT_CLOSE_POSITION, DEFAULT_OPEN_POSITION)
        } else {
            Self::new(DEFAULT_OPEN_POSITION, DEFAULT_CLOSE_POSITION)
        }
    }

    pub fn for_command(&self, command: ClawCommand) -> f64 {
        language_to_direction(command, self.open, self.close)
    }
}

impl Default for ClawPositions {
    fn default() -> Self {
        Self::from_reverse(false)
    }
}

pub fn language_to_direction(command: ClawCommand, open_value: f64, close_value: f64) -> f64 {
    match command {
        ClawCommand::Open => open_value,
        ClawCommand::Close => close_value,
    }
}

pub fn language_to_direction_str(command: &str, open_value: f64, close_value: f64) -> Result<f64, CommandError> {
    Ok(language_to_direction(command.parse()?, open_value, close_value))
}

pub fn dual_language_to_direction<const N: usize>(command: ClawCommand, open_value: f64, close_value: f64) -> [f64; N] {
    [language_to_direction(command, open_value, close_value); N]
}

pub fn dual_language_to_direction_str<const N: usize>(
    command: &str,
    open_value: f64,
    close_value: f64,
) -> Result<[f64; N], CommandError> {
    Ok(dual_language_to_direction(command.parse()?, open_value, close_value))
}

/// Resolves an open/close button pair. Conflicting or absent input holds `current_value`.
pub fn control_to_direction(
    open_value: f64,
    close_value: f64,
    current_value: f64,
    open_button: bool,
    close_button: bool,
) -> f64 {
    match (open_button, close_button) {
        (true, false) => open_value,
        (false, true) => close_value,
        _ => current_value,
    }
}

pub fn dual_control_to_direction<const N: usize>(
    open_value: f64,
    close_value: f64,
    current_value: f64,
    open_button: bool,
    close_button: bool,
) -> [f64; N] {
    [control_to_direction(open_value, close_value, current_value, open_button, close_button); N]
}
