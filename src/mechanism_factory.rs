use anyhow::anyhow;
use log::info;

use crate::claw::{Claw, DualClaw};
use crate::lift::{DualLift, Lift};
use crate::mechanism::Mechanism;
use crate::mechanism_hal::HardwareMap;
use crate::robot_config::RobotConfig;

pub struct MechanismFactory<'a> {
    config: &'a RobotConfig,
}

impl<'a> MechanismFactory<'a> {
    pub fn new(config: &'a RobotConfig) -> Self {
        Self { config }
    }

    /// Claws first, then lifts, in config order. Solo or dual is picked by device count.
    pub fn create_mechanisms(&self, hardware_map: &mut dyn HardwareMap) -> anyhow::Result<Vec<Box<dyn Mechanism>>> {
        self.config.validate()?;
        let mut mechanisms: Vec<Box<dyn Mechanism>> = Vec::new();
        for claw in &self.config.claws {
            mechanisms.push(match claw.servos.len() {
                1 => Box::new(Claw::new(hardware_map, claw)?),
                2 => Box::new(DualClaw::new(hardware_map, claw)?),
                n => return Err(anyhow!("claw {:?}: unsupported servo count {n}", claw.name)),
            });
        }
        for lift in &self.config.lifts {
            mechanisms.push(match lift.motors.len() {
                1 => Box::new(Lift::new(hardware_map, lift)?),
                2 => Box::new(DualLift::new(hardware_map, lift)?),
                n => return Err(anyhow!("lift {:?}: unsupported motor count {n}", lift.name)),
            });
        }
        info!("Created {} mechanism(s)", mechanisms.len());
        Ok(mechanisms)
    }
}
