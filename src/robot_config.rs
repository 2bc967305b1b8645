use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Context};
use log::info;
use serde::{Deserialize, Serialize};

use crate::claw::ClawConfig;
use crate::gamepad::{Button, ButtonBinding};
use crate::lift::LiftConfig;
use crate::lift_util::DeadZoneCurve;

fn default_tick_interval_ms() -> u64 {
    20
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct RobotConfig {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default)]
    pub claws: Vec<ClawConfig>,
    #[serde(default)]
    pub lifts: Vec<LiftConfig>,
}

impl Default for RobotConfig {
    /// A single-servo claw on A/B and a two-motor lift on the triggers.
    fn default() -> Self {
        let mut lift = LiftConfig::new("lift", &["lift_left", "lift_right"]);
        lift.curve = DeadZoneCurve::Rescaled;
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            claws: vec![ClawConfig {
                name: "claw".to_owned(),
                servos: vec!["claw_servo".to_owned()],
                reverse: false,
                positions: None,
                buttons: ButtonBinding::new(Button::A, Button::B),
            }],
            lifts: vec![lift],
        }
    }
}

impl RobotConfig {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        info!("Loading robot config from {}", path.display());
        let file = File::open(path)
            .with_context(|| format!("opening robot config {}", path.display()))?;
        let config: RobotConfig = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing robot config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("creating robot config {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(anyhow!("tick_interval_ms must be positive"));
        }
        for claw in &self.claws {
            if !(1..=2).contains(&claw.servos.len()) {
                return Err(anyhow!("claw {:?} must have one or two servos, has {}", claw.name, claw.servos.len()));
            }
        }
        for lift in &self.lifts {
            lift.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::process;

    use crate::gamepad::AxisBinding;

    use super::*;

    #[test]
    fn test_default_is_valid() {
        RobotConfig::default().validate().unwrap();
    }

    #[test]
    fn test_minimal_json_fills_defaults() {
        let json = r#"{
            "claws": [{"name": "claw", "servos": ["s0"], "reverse": true}],
            "lifts": [{"name": "lift", "motors": ["m0", "m1"], "curve": "rescaled"}]
        }"#;
        let config: RobotConfig = serde_json::from_str(json).unwrap();
        config.validate().unwrap();
        assert_eq!(config.tick_interval(), Duration::from_millis(20));
        assert_eq!(config.claws[0].positions().open, 0.0);
        assert_eq!(config.claws[0].buttons, ButtonBinding::default());
        let lift = &config.lifts[0];
        assert_eq!(lift.dead_zone, 0.1);
        assert_eq!(lift.max_power, 1.0);
        assert_eq!(lift.curve, DeadZoneCurve::Rescaled);
        assert_eq!(lift.axes, AxisBinding::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = RobotConfig::default();
        config.lifts[0].dead_zone = 1.0;
        assert!(config.validate().is_err());

        let mut config = RobotConfig::default();
        config.lifts[0].max_power = 0.0;
        assert!(config.validate().is_err());

        let mut config = RobotConfig::default();
        config.claws[0].servos.clear();
        assert!(config.validate().is_err());

        let mut config = RobotConfig::default();
        config.lifts[0].motors.push("third".to_owned());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_then_load() {
        let path = env::temp_dir().join(format!("ftc-mechanisms-config-{}.json", process::id()));
        let config = RobotConfig::default();
        config.save(&path).unwrap();
        let loaded = RobotConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
