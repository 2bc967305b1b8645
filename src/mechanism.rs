use crate::gamepad::GamepadState;

/// Anything the tele-op loop ticks once per control-loop iteration.
pub trait Mechanism {
    fn name(&self) -> &str;
    fn update(&mut self, gamepad: &GamepadState) -> anyhow::Result<()>;
    /// Leave the mechanism in a safe resting state.
    fn stop(&mut self) -> anyhow::Result<()>;
}
