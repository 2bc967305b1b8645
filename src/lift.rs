use anyhow::{anyhow, Context};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::command::LiftCommand;
use crate::gamepad::{AxisBinding, GamepadState};
use crate::lift_util;
use crate::lift_util::DeadZoneCurve;
use crate::mechanism::Mechanism;
use crate::mechanism_hal::{HardwareMap, MotorDirection, MotorHal};

pub const DEFAULT_DEAD_ZONE: f64 = 0.1;

fn default_dead_zone() -> f64 {
    DEFAULT_DEAD_ZONE
}

fn default_max_power() -> f64 {
    1.0
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct LiftConfig {
    pub name: String,
    pub motors: Vec<String>,
    #[serde(default)]
    pub reverse: bool,
    #[serde(default = "default_dead_zone")]
    pub dead_zone: f64,
    #[serde(default)]
    pub curve: DeadZoneCurve,
    #[serde(default = "default_max_power")]
    pub max_power: f64,
    #[serde(default, alias = "triggers")]
    pub axes: AxisBinding,
}

impl LiftConfig {
    pub fn new(name: &str, motors: &[&str]) -> Self {
        Self {
            name: name.to_owned(),
            motors: motors.iter().map(|m| m.to_string()).collect(),
            reverse: false,
            dead_zone: DEFAULT_DEAD_ZONE,
            curve: DeadZoneCurve::default(),
            max_power: default_max_power(),
            axes: AxisBinding::default(),
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !(1..=2).contains(&self.motors.len()) {
            return Err(anyhow!("lift {:?} must have one or two motors, has {}", self.name, self.motors.len()));
        }
        if !(0.0..1.0).contains(&self.dead_zone) {
            return Err(anyhow!("lift {:?} dead_zone {} outside [0, 1)", self.name, self.dead_zone));
        }
        if !(self.max_power > 0.0 && self.max_power <= 1.0) {
            return Err(anyhow!("lift {:?} max_power {} outside (0, 1]", self.name, self.max_power));
        }
        Ok(())
    }
}

/// Lift driven by `N` motors that always receive the same power.
pub struct LiftMechanism<const N: usize> {
    name: String,
    motors: [Box<dyn MotorHal>; N],
    dead_zone: f64,
    curve: DeadZoneCurve,
    max_power: f64,
    axes: AxisBinding,
    written: [Option<f64>; N],
}

pub type Lift = LiftMechanism<1>;
pub type DualLift = LiftMechanism<2>;

impl<const N: usize> LiftMechanism<N> {
    pub fn new(hardware_map: &mut dyn HardwareMap, config: &LiftConfig) -> anyhow::Result<Self> {
        config.validate()?;
        if config.motors.len() != N {
            return Err(anyhow!("lift {:?} needs {N} motor(s), got {}", config.name, config.motors.len()));
        }
        let direction = MotorDirection::from_reverse(config.reverse);
        let mut motors = Vec::with_capacity(N);
        for name in &config.motors {
            let mut motor = hardware_map.motor(name)
                .with_context(|| format!("lift {:?}", config.name))?;
            motor.set_direction(direction)
                .with_context(|| format!("lift {:?}: setting direction of {name:?}", config.name))?;
            motors.push(motor);
        }
        let motors: [Box<dyn MotorHal>; N] = motors.try_into()
            .map_err(|_| anyhow!("lift {:?}: motor count changed", config.name))?;
        Ok(Self {
            name: config.name.clone(),
            motors,
            dead_zone: config.dead_zone,
            curve: config.curve,
            max_power: config.max_power,
            axes: config.axes,
            written: [None; N],
        })
    }

    pub fn set(&mut self, command: LiftCommand) -> anyhow::Result<()> {
        debug!("{}: {command}", self.name);
        self.apply(lift_util::dual_language_to_direction::<N>(command))
    }

    pub fn set_str(&mut self, command: &str) -> anyhow::Result<()> {
        let directions = lift_util::dual_language_to_direction_str::<N>(command)?;
        self.apply(directions)
    }

    /// Power every motor was last set to, already scaled by `max_power`. `None` before the
    /// first command or while the motors disagree after a failed write.
    pub fn power(&self) -> Option<f64> {
        let first = self.written.first().copied().flatten()?;
        self.written.iter().all(|w| *w == Some(first)).then(|| first)
    }

    fn apply(&mut self, directions: [f64; N]) -> anyhow::Result<()> {
        let max_power = self.max_power;
        let powers = directions.map(|direction| (direction * max_power).clamp(-1.0, 1.0));
        for ((motor, written), power) in self.motors.iter_mut().zip(self.written.iter_mut()).zip(powers) {
            *written = None;
            motor.set_power(power)
                .with_context(|| format!("lift {:?}: setting power {power}", self.name))?;
            *written = Some(power);
        }
        Ok(())
    }
}

impl<const N: usize> Mechanism for LiftMechanism<N> {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, gamepad: &GamepadState) -> anyhow::Result<()> {
        let (down, up) = self.axes.resolve(gamepad);
        let directions = lift_util::dual_control_to_direction_with_curve::<N>(self.curve, self.dead_zone, down, up);
        trace!("{}: down={down} up={up} -> {directions:?}", self.name);
        self.apply(directions)
    }

    fn stop(&mut self) -> anyhow::Result<()> {
        self.apply([0.0; N])
    }
}

#[cfg(test)]
mod tests {
    use crate::mechanism_hal_mock::MockHardwareMap;

    use super::*;

    fn triggers(down: f64, up: f64) -> GamepadState {
        GamepadState { left_trigger: down, right_trigger: up, ..Default::default() }
    }

    #[test]
    fn test_triggers_drive_motor_outside_dead_zone() {
        let mut map = MockHardwareMap::new();
        let motor = map.add_motor("lift_motor");
        let mut lift = Lift::new(&mut map, &LiftConfig::new("lift", &["lift_motor"])).unwrap();

        lift.update(&triggers(0.0, 0.05)).unwrap();
        assert_eq!(motor.power(), 0.0);

        lift.update(&triggers(0.0, 0.8)).unwrap();
        assert!((motor.power() - 0.8).abs() < 1e-9);

        lift.update(&triggers(0.6, 0.0)).unwrap();
        assert!((motor.power() + 0.6).abs() < 1e-9);

        lift.stop().unwrap();
        assert_eq!(motor.power(), 0.0);
    }

    #[test]
    fn test_dual_lift_rescaled_matches_both_motors() {
        let mut map = MockHardwareMap::new();
        let left = map.add_motor("left");
        let right = map.add_motor("right");
        let mut config = LiftConfig::new("lift", &["left", "right"]);
        config.curve = DeadZoneCurve::Rescaled;
        let mut lift = DualLift::new(&mut map, &config).unwrap();

        lift.update(&triggers(0.5, 0.0)).unwrap();
        assert!((left.power() - -0.45).abs() < 0.01);
        assert_eq!(left.power(), right.power());
        assert_eq!(lift.power(), Some(left.power()));
    }

    #[test]
    fn test_commands_scale_by_max_power_and_reverse_sets_direction() {
        let mut map = MockHardwareMap::new();
        let motor = map.add_motor("lift_motor");
        let mut config = LiftConfig::new("lift", &["lift_motor"]);
        config.reverse = true;
        config.max_power = 0.5;
        let mut lift = Lift::new(&mut map, &config).unwrap();
        assert_eq!(motor.direction(), MotorDirection::Reverse);

        lift.set(LiftCommand::Up).unwrap();
        assert_eq!(motor.power(), 0.5);
        lift.set_str("down").unwrap();
        assert_eq!(motor.power(), -0.5);
        assert!(lift.set_str("sideways").is_err());
        assert_eq!(motor.power(), -0.5);
    }

    #[test]
    fn test_missing_motor_fails() {
        let mut map = MockHardwareMap::new();
        map.add_motor("left");
        assert!(DualLift::new(&mut map, &LiftConfig::new("lift", &["left", "right"])).is_err());
        assert!(Lift::new(&mut map, &LiftConfig::new("lift", &["left", "right"])).is_err());
    }

    #[test]
    fn test_out_of_range_limits_rejected() {
        let mut map = MockHardwareMap::new();
        let motor = map.add_motor("lift_motor");
        let mut config = LiftConfig::new("lift", &["lift_motor"]);
        config.max_power = 2.0;
        assert!(Lift::new(&mut map, &config).is_err());

        let mut config = LiftConfig::new("lift", &["lift_motor"]);
        config.dead_zone = 1.5;
        assert!(Lift::new(&mut map, &config).is_err());
        assert_eq!(motor.commands(), 0);
    }

    #[test]
    fn test_power_stays_within_unit_range() {
        let mut map = MockHardwareMap::new();
        let motor = map.add_motor("lift_motor");
        let mut lift = Lift::new(&mut map, &LiftConfig::new("lift", &["lift_motor"])).unwrap();
        lift.update(&triggers(0.0, 3.0)).unwrap();
        assert_eq!(motor.power(), 1.0);
        lift.set(LiftCommand::Down).unwrap();
        assert_eq!(motor.power(), -1.0);
    }

    #[test]
    fn test_dual_lift_recovers_after_second_motor_fails() {
        let mut map = MockHardwareMap::new();
        let left = map.add_motor("left");
        let right = map.add_motor("right");
        let mut lift = DualLift::new(&mut map, &LiftConfig::new("lift", &["left", "right"])).unwrap();

        right.set_connected(false);
        assert!(lift.set(LiftCommand::Up).is_err());
        assert_eq!(left.power(), 1.0);
        assert_eq!(right.power(), 0.0);
        assert_eq!(lift.power(), None);

        right.set_connected(true);
        lift.stop().unwrap();
        assert_eq!(left.power(), 0.0);
        assert_eq!(right.power(), 0.0);
        assert_eq!(lift.power(), Some(0.0));
    }

    #[test]
    fn test_stick_binding_drives_lift() {
        let mut map = MockHardwareMap::new();
        let motor = map.add_motor("lift_motor");
        let mut config = LiftConfig::new("lift", &["lift_motor"]);
        config.axes = AxisBinding::left_stick();
        let mut lift = Lift::new(&mut map, &config).unwrap();

        lift.update(&GamepadState { left_stick_y: -0.7, right_trigger: 1.0, ..Default::default() }).unwrap();
        assert!((motor.power() - 0.7).abs() < 1e-9);
        lift.update(&GamepadState { left_stick_y: 0.05, ..Default::default() }).unwrap();
        assert_eq!(motor.power(), 0.0);
    }
}
