use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use log::{error, info, trace};

use crate::gamepad::GamepadSource;
use crate::mechanism::Mechanism;
use crate::timed_wait;
use crate::timed_wait::{ActiveFlag, WaitOutcome};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum OpModePhase {
    Init,
    Active,
    Stopped,
}

impl OpModePhase {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => OpModePhase::Init,
            1 => OpModePhase::Active,
            _ => OpModePhase::Stopped,
        }
    }
}

/// Shared view of the op-mode lifecycle. Clones observe the same phase, so another thread
/// can stop the op-mode and cut short any wait in progress.
#[derive(Debug, Clone)]
pub struct OpModeHandle {
    phase: Arc<AtomicU8>,
}

impl Default for OpModeHandle {
    fn default() -> Self {
        Self { phase: Arc::new(AtomicU8::new(OpModePhase::Init as u8)) }
    }
}

impl OpModeHandle {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn phase(&self) -> OpModePhase {
        OpModePhase::from_u8(self.phase.load(Ordering::Acquire))
    }

    /// Init -> Active. A stopped op-mode stays stopped.
    pub fn start(&self) -> bool {
        let started = self.phase
            .compare_exchange(OpModePhase::Init as u8, OpModePhase::Active as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if started {
            info!("Op-mode started");
        }
        started
    }

    pub fn request_stop(&self) {
        if self.phase.swap(OpModePhase::Stopped as u8, Ordering::AcqRel) != OpModePhase::Stopped as u8 {
            info!("Op-mode stop requested");
        }
    }

    pub fn wait(&self, seconds: f64) -> WaitOutcome {
        timed_wait::wait(seconds, self)
    }
}

impl ActiveFlag for OpModeHandle {
    fn is_active(&self) -> bool {
        self.phase() == OpModePhase::Active
    }
}

pub struct TeleOpRunner {
    mechanisms: Vec<Box<dyn Mechanism>>,
    gamepad: Box<dyn GamepadSource>,
    tick_interval: Duration,
}

impl TeleOpRunner {
    pub fn new(mechanisms: Vec<Box<dyn Mechanism>>, gamepad: Box<dyn GamepadSource>) -> Self {
        Self { mechanisms, gamepad, tick_interval: DEFAULT_TICK_INTERVAL }
    }

    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    /// Runs until the op-mode stops or `max_ticks` ticks have run, then stops every
    /// mechanism. Returns the number of ticks executed.
    pub fn run(&mut self, op_mode: &OpModeHandle, max_ticks: Option<u64>) -> anyhow::Result<u64> {
        op_mode.start();
        let mut ticks = 0;
        let result = loop {
            if !op_mode.is_active() || max_ticks.map_or(false, |max| ticks >= max) {
                break Ok(());
            }
            if let Err(e) = self.tick() {
                break Err(e);
            }
            ticks += 1;
            trace!("<tick {ticks}>");
            timed_wait::wait_for(self.tick_interval, op_mode);
        };
        op_mode.request_stop();

        let stopped = self.stop_all();
        if let Err(e) = &result {
            error!("Tele-op aborted after {ticks} ticks: {e:?}");
        }
        result.and(stopped).map(|_| ticks)
    }

    fn tick(&mut self) -> anyhow::Result<()> {
        let state = self.gamepad.poll();
        for mechanism in self.mechanisms.iter_mut() {
            mechanism.update(&state)
                .with_context(|| format!("updating {}", mechanism.name()))?;
        }
        Ok(())
    }

    /// Every mechanism gets a stop attempt even if an earlier one fails.
    fn stop_all(&mut self) -> anyhow::Result<()> {
        let mut first_error = None;
        for mechanism in self.mechanisms.iter_mut() {
            if let Err(e) = mechanism.stop() {
                error!("Failed to stop {}: {e:?}", mechanism.name());
                first_error.get_or_insert(e.context(format!("stopping {}", mechanism.name())));
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
