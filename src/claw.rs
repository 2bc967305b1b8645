use anyhow::{anyhow, Context};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::claw_util;
use crate::claw_util::ClawPositions;
use crate::command::ClawCommand;
use crate::gamepad::{ButtonBinding, GamepadState};
use crate::mechanism::Mechanism;
use crate::mechanism_hal::{HardwareMap, ServoHal};

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ClawConfig {
    pub name: String,
    pub servos: Vec<String>,
    #[serde(default)]
    pub reverse: bool,
    /// Explicit positions win over the ones implied by `reverse`.
    #[serde(default)]
    pub positions: Option<ClawPositions>,
    #[serde(default)]
    pub buttons: ButtonBinding,
}

impl ClawConfig {
    pub fn positions(&self) -> ClawPositions {
        self.positions.unwrap_or_else(|| ClawPositions::from_reverse(self.reverse))
    }
}

/// Claw driven by `N` servos that always receive the same position.
pub struct ClawMechanism<const N: usize> {
    name: String,
    servos: [Box<dyn ServoHal>; N],
    positions: ClawPositions,
    buttons: ButtonBinding,
    written: [Option<f64>; N],
}

pub type Claw = ClawMechanism<1>;
pub type DualClaw = ClawMechanism<2>;

impl<const N: usize> ClawMechanism<N> {
    pub fn new(hardware_map: &mut dyn HardwareMap, config: &ClawConfig) -> anyhow::Result<Self> {
        if config.servos.len() != N {
            return Err(anyhow!("claw {:?} needs {N} servo(s), got {}", config.name, config.servos.len()));
        }
        let servos = config.servos.iter()
            .map(|name| hardware_map.servo(name)
                .with_context(|| format!("claw {:?}", config.name)))
            .collect::<anyhow::Result<Vec<_>>>()?;
        let servos: [Box<dyn ServoHal>; N] = servos.try_into()
            .map_err(|_| anyhow!("claw {:?}: servo count changed", config.name))?;
        // Servos that cannot report a position start out unknown.
        let mut written = [None; N];
        for (slot, servo) in written.iter_mut().zip(&servos) {
            *slot = servo.position().ok();
        }
        Ok(Self {
            name: config.name.clone(),
            servos,
            positions: config.positions(),
            buttons: config.buttons,
            written,
        })
    }

    pub fn set(&mut self, command: ClawCommand) -> anyhow::Result<()> {
        debug!("{}: {command}", self.name);
        self.apply(claw_util::dual_language_to_direction::<N>(command, self.positions.open, self.positions.close))
    }

    pub fn set_str(&mut self, command: &str) -> anyhow::Result<()> {
        let targets = claw_util::dual_language_to_direction_str::<N>(command, self.positions.open, self.positions.close)?;
        self.apply(targets)
    }

    pub fn open(&mut self) -> anyhow::Result<()> {
        self.set(ClawCommand::Open)
    }

    pub fn close(&mut self) -> anyhow::Result<()> {
        self.set(ClawCommand::Close)
    }

    /// Position shared by every servo, `None` until all of them are known to agree.
    pub fn position(&self) -> Option<f64> {
        let first = self.written.first().copied().flatten()?;
        self.written.iter().all(|w| *w == Some(first)).then(|| first)
    }

    pub fn positions(&self) -> ClawPositions {
        self.positions
    }

    /// Servos already at their target are skipped.
    fn apply(&mut self, targets: [f64; N]) -> anyhow::Result<()> {
        for ((servo, written), target) in self.servos.iter_mut().zip(self.written.iter_mut()).zip(targets) {
            let target = target.clamp(0.0, 1.0);
            if *written == Some(target) {
                continue;
            }
            *written = None;
            servo.set_position(target)
                .with_context(|| format!("claw {:?}: moving to {target}", self.name))?;
            *written = Some(target);
        }
        Ok(())
    }
}

impl<const N: usize> Mechanism for ClawMechanism<N> {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, gamepad: &GamepadState) -> anyhow::Result<()> {
        let (open_button, close_button) = self.buttons.resolve(gamepad);
        let ClawPositions { open, close } = self.positions;
        match self.position() {
            Some(current) => {
                self.apply(claw_util::dual_control_to_direction::<N>(open, close, current, open_button, close_button))
            }
            // Nothing to hold yet, so only an unambiguous press moves the claw.
            None if open_button != close_button => {
                self.apply(claw_util::dual_control_to_direction::<N>(open, close, close, open_button, close_button))
            }
            None => Ok(()),
        }
    }

    fn stop(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}
