//! Gamepad snapshots and the bindings that turn them into button and axis pairs.

use std::collections::VecDeque;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use derive_new::new;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, PartialEq, Copy, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GamepadState {
    pub a: bool,
    pub b: bool,
    pub x: bool,
    pub y: bool,
    pub left_bumper: bool,
    pub right_bumper: bool,
    pub dpad_up: bool,
    pub dpad_down: bool,
    pub dpad_left: bool,
    pub dpad_right: bool,
    pub left_trigger: f64,
    pub right_trigger: f64,
    pub left_stick_x: f64,
    pub left_stick_y: f64,
    pub right_stick_x: f64,
    pub right_stick_y: f64,
}

#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Button {
    A,
    B,
    X,
    Y,
    LeftBumper,
    RightBumper,
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
}

/// Analog inputs read as a magnitude in [0, 1]. Stick axes are split into halves so a
/// lift can be bound to pushing a stick one way or the other. Stick y is negative when
/// pushed up.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    LeftTrigger,
    RightTrigger,
    LeftStickUp,
    LeftStickDown,
    LeftStickLeft,
    LeftStickRight,
    RightStickUp,
    RightStickDown,
    RightStickLeft,
    RightStickRight,
}

impl GamepadState {
    pub fn pressed(&self, button: Button) -> bool {
        match button {
            Button::A => self.a,
            Button::B => self.b,
            Button::X => self.x,
            Button::Y => self.y,
            Button::LeftBumper => self.left_bumper,
            Button::RightBumper => self.right_bumper,
            Button::DpadUp => self.dpad_up,
            Button::DpadDown => self.dpad_down,
            Button::DpadLeft => self.dpad_left,
            Button::DpadRight => self.dpad_right,
        }
    }

    pub fn axis(&self, axis: Axis) -> f64 {
        let value = match axis {
            Axis::LeftTrigger => self.left_trigger,
            Axis::RightTrigger => self.right_trigger,
            Axis::LeftStickUp => -self.left_stick_y,
            Axis::LeftStickDown => self.left_stick_y,
            Axis::LeftStickLeft => -self.left_stick_x,
            Axis::LeftStickRight => self.left_stick_x,
            Axis::RightStickUp => -self.right_stick_y,
            Axis::RightStickDown => self.right_stick_y,
            Axis::RightStickLeft => -self.right_stick_x,
            Axis::RightStickRight => self.right_stick_x,
        };
        value.clamp(0.0, 1.0)
    }
}

#[derive(new, Debug, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub struct ButtonBinding {
    pub open: Button,
    pub close: Button,
}

impl Default for ButtonBinding {
    fn default() -> Self {
        Self::new(Button::A, Button::B)
    }
}

impl ButtonBinding {
    /// `(open_requested, close_requested)`
    pub fn resolve(&self, state: &GamepadState) -> (bool, bool) {
        (state.pressed(self.open), state.pressed(self.close))
    }
}

#[derive(new, Debug, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub struct AxisBinding {
    pub down: Axis,
    pub up: Axis,
}

impl Default for AxisBinding {
    fn default() -> Self {
        Self::new(Axis::LeftTrigger, Axis::RightTrigger)
    }
}

impl AxisBinding {
    pub fn left_stick() -> Self {
        Self::new(Axis::LeftStickDown, Axis::LeftStickUp)
    }

    /// `(down, up)` magnitudes.
    pub fn resolve(&self, state: &GamepadState) -> (f64, f64) {
        (state.axis(self.down), state.axis(self.up))
    }
}

pub trait GamepadSource {
    fn poll(&mut self) -> GamepadState;
}

#[derive(new, Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct GamepadFrame {
    /// How many control-loop ticks this state is held for.
    pub ticks: u32,
    pub state: GamepadState,
}

/// Replays recorded frames; the last frame is held once the script runs out.
#[derive(Debug, Default)]
pub struct ScriptedGamepad {
    frames: VecDeque<GamepadFrame>,
    current: GamepadState,
    remaining: u32,
}

impl ScriptedGamepad {
    pub fn new(frames: Vec<GamepadFrame>) -> Self {
        Self { frames: frames.into(), ..Default::default() }
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("opening gamepad script {}", path.display()))?;
        let frames: Vec<GamepadFrame> = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing gamepad script {}", path.display()))?;
        Ok(Self::new(frames))
    }

    pub fn is_exhausted(&self) -> bool {
        self.frames.is_empty() && self.remaining == 0
    }
}

impl GamepadSource for ScriptedGamepad {
    fn poll(&mut self) -> GamepadState {
        while self.remaining == 0 {
            match self.frames.pop_front() {
                Some(frame) => {
                    self.current = frame.state;
                    self.remaining = frame.ticks;
                }
                None => return self.current,
            }
        }
        self.remaining -= 1;
        self.current
    }
}

impl<F> GamepadSource for F
where
    F: FnMut() -> GamepadState,
{
    fn poll(&mut self) -> GamepadState {
        (self)()
    }
}
