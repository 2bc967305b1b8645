use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, PartialEq, Clone, Debug)]
pub enum HalError {
    #[error("{0}")]
    DeviceNotConnected(String),
    #[error("{0}")]
    InternalError(String),
}

pub type HalResult<T> = Result<T, HalError>;

pub trait ServoHal {
    /// Position in [0, 1].
    fn set_position(&mut self, position: f64) -> HalResult<()>;
    fn position(&self) -> HalResult<f64>;
}

pub trait MotorHal {
    /// Power in [-1, 1], sign relative to the configured direction.
    fn set_power(&mut self, power: f64) -> HalResult<()>;
    fn set_direction(&mut self, direction: MotorDirection) -> HalResult<()>;
}

/// Looks up devices by the names they were configured with on the robot.
pub trait HardwareMap {
    fn servo(&mut self, name: &str) -> HalResult<Box<dyn ServoHal>>;
    fn motor(&mut self, name: &str) -> HalResult<Box<dyn MotorHal>>;
}

#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MotorDirection {
    Forward,
    Reverse,
}

impl MotorDirection {
    pub fn from_reverse(reverse: bool) -> Self {
        if reverse {
            MotorDirection::Reverse
        } else {
            MotorDirection::Forward
        }
    }
}
