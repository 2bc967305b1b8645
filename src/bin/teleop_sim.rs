//! Run a tele-op session against mock hardware.
//!
//! Every device named in the robot config is created on an in-memory hardware map, the
//! gamepad is replayed from a JSON script, and the final device state is printed as JSON.

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use log::info;
use rand::Rng;

use ftc_mechanisms::gamepad::{GamepadSource, GamepadState, ScriptedGamepad};
use ftc_mechanisms::mechanism_factory::MechanismFactory;
use ftc_mechanisms::mechanism_hal_mock::MockHardwareMap;
use ftc_mechanisms::op_mode::{OpModeHandle, TeleOpRunner};
use ftc_mechanisms::robot_config::RobotConfig;

#[derive(Parser, Debug)]
#[clap(name = "teleop_sim")]
struct Opts {
    /// Robot config JSON; the built-in claw + dual lift robot when omitted.
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Gamepad script JSON (array of frames); an idle gamepad when omitted.
    #[clap(short, long)]
    script: Option<PathBuf>,

    #[clap(short = 'n', long, default_value = "250")]
    max_ticks: u64,

    /// Add up to this much random trigger noise to every tick, like a worn controller.
    #[clap(long, default_value = "0.0")]
    drift: f64,

    /// Write the built-in robot config here and exit.
    #[clap(long)]
    write_default_config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opts: Opts = Opts::parse();

    if let Some(path) = opts.write_default_config {
        RobotConfig::default().save(&path)?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let config = match &opts.config {
        Some(path) => RobotConfig::load(path)?,
        None => RobotConfig::default(),
    };

    let mut hardware_map = MockHardwareMap::new();
    for claw in &config.claws {
        for servo in &claw.servos {
            hardware_map.add_servo(servo);
        }
    }
    for lift in &config.lifts {
        for motor in &lift.motors {
            hardware_map.add_motor(motor);
        }
    }
    let mechanisms = MechanismFactory::new(&config).create_mechanisms(&mut hardware_map)?;

    let mut scripted = match &opts.script {
        Some(path) => ScriptedGamepad::load(path)?,
        None => ScriptedGamepad::default(),
    };
    let drift = opts.drift.clamp(0.0, 1.0);
    let mut rng = rand::thread_rng();
    let gamepad = move || -> GamepadState {
        let mut state = scripted.poll();
        if drift > 0.0 {
            state.left_trigger = (state.left_trigger + rng.gen_range(0.0..drift)).min(1.0);
            state.right_trigger = (state.right_trigger + rng.gen_range(0.0..drift)).min(1.0);
        }
        state
    };

    let mut runner = TeleOpRunner::new(mechanisms, Box::new(gamepad))
        .with_tick_interval(config.tick_interval());
    let op_mode = OpModeHandle::new();
    let start = Instant::now();
    let ticks = runner.run(&op_mode, Some(opts.max_ticks))?;
    info!("Ran {ticks} ticks in {:?}", start.elapsed());

    println!("{}", serde_json::to_string_pretty(&hardware_map.snapshot())?);
    Ok(())
}
