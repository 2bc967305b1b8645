pub mod command;
pub mod claw_util;
pub mod lift_util;
pub mod timed_wait;

pub mod gamepad;
pub mod mechanism;
pub mod mechanism_hal;
pub mod mechanism_hal_mock;
pub mod mechanism_factory;
pub mod claw;
pub mod lift;
pub mod op_mode;
pub mod robot_config;
