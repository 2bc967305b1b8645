//! Pure helpers mapping lift commands and trigger pairs to motor power.

use serde::{Deserialize, Serialize};

use crate::command::{CommandError, LiftCommand};

pub const UP_POWER: f64 = 1.0;
pub const DOWN_POWER: f64 = -1.0;

/// Response applied to trigger input once it leaves the dead zone.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadZoneCurve {
    /// Differential passes through unchanged.
    Linear,
    /// Edge of the dead zone maps to 0, full deflection to 1.
    Rescaled,
}

impl Default for DeadZoneCurve {
    fn default() -> Self {
        DeadZoneCurve::Linear
    }
}

pub fn language_to_direction(command: LiftCommand) -> f64 {
    match command {
        LiftCommand::Up => UP_POWER,
        LiftCommand::Down => DOWN_POWER,
    }
}

pub fn language_to_direction_str(command: &str) -> Result<f64, CommandError> {
    Ok(language_to_direction(command.parse()?))
}

pub fn dual_language_to_direction<const N: usize>(command: LiftCommand) -> [f64; N] {
    [language_to_direction(command); N]
}

pub fn dual_language_to_direction_str<const N: usize>(command: &str) -> Result<[f64; N], CommandError> {
    Ok(dual_language_to_direction(command.parse()?))
}

/// Signed lift power from a down/up trigger pair. A differential whose magnitude is at or
/// below `dead_zone` is no movement.
pub fn control_to_direction(dead_zone: f64, down: f64, up: f64) -> f64 {
    control_to_direction_with_curve(DeadZoneCurve::Linear, dead_zone, down, up)
}

pub fn control_to_direction_with_curve(curve: DeadZoneCurve, dead_zone: f64, down: f64, up: f64) -> f64 {
    let raw = (up - down).clamp(-1.0, 1.0);
    if raw.abs() <= dead_zone {
        return 0.0;
    }
    match curve {
        DeadZoneCurve::Linear => raw,
        DeadZoneCurve::Rescaled => {
            let magnitude = (raw.abs() - dead_zone) / (1.0 - dead_zone);
            raw.signum() * magnitude.clamp(0.0, 1.0)
        }
    }
}

pub fn dual_control_to_direction<const N: usize>(dead_zone: f64, down: f64, up: f64) -> [f64; N] {
    [control_to_direction(dead_zone, down, up); N]
}

pub fn dual_control_to_direction_with_curve<const N: usize>(
    curve: DeadZoneCurve,
    dead_zone: f64,
    down: f64,
    up: f64,
) -> [f64; N] {
    [control_to_direction_with_curve(curve, dead_zone, down, up); N]
}
