//! Bounded busy-wait for the control loop.
//!
//! Spins instead of sleeping: the calling thread is never suspended or yielded while
//! waiting. Clearing the active flag is the only way to end a wait early.

use std::hint;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use log::trace;

/// Query answering "is the control loop still active".
pub trait ActiveFlag {
    fn is_active(&self) -> bool;
}

impl<F> ActiveFlag for F
where
    F: Fn() -> bool,
{
    fn is_active(&self) -> bool {
        (self)()
    }
}

impl ActiveFlag for AtomicBool {
    fn is_active(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum WaitOutcome {
    Elapsed,
    Deactivated,
}

/// Spins until `budget_seconds` have elapsed or `active` reports false. Zero, negative
/// and NaN budgets return immediately.
pub fn wait(budget_seconds: f64, active: &(impl ActiveFlag + ?Sized)) -> WaitOutcome {
    if budget_seconds.is_nan() || budget_seconds <= 0.0 {
        return WaitOutcome::Elapsed;
    }
    let budget = Duration::try_from_secs_f64(budget_seconds).unwrap_or(Duration::MAX);
    wait_for(budget, active)
}

pub fn wait_for(budget: Duration, active: &(impl ActiveFlag + ?Sized)) -> WaitOutcome {
    let start = Instant::now();
    let mut polls: u64 = 0;
    let outcome = loop {
        if !active.is_active() {
            break WaitOutcome::Deactivated;
        }
        if start.elapsed() >= budget {
            break WaitOutcome::Elapsed;
        }
        polls += 1;
        hint::spin_loop();
    };
    trace!("wait_for {budget:?}: {outcome:?} after {polls} polls");
    outcome
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn test_zero_negative_and_nan_budget_return_immediately() {
        let start = Instant::now();
        assert_eq!(wait(0.0, &|| true), WaitOutcome::Elapsed);
        assert_eq!(wait(-3.0, &|| true), WaitOutcome::Elapsed);
        assert_eq!(wait(f64::NAN, &|| true), WaitOutcome::Elapsed);
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[test]
    fn test_inactive_flag_returns_immediately() {
        let start = Instant::now();
        let flag = AtomicBool::new(false);
        assert_eq!(wait(10.0, &flag), WaitOutcome::Deactivated);
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[test]
    fn test_waits_for_full_budget_while_active() {
        let start = Instant::now();
        assert_eq!(wait(0.02, &|| true), WaitOutcome::Elapsed);
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_flag_cleared_from_another_thread_cancels_wait() {
        let flag = Arc::new(AtomicBool::new(true));
        let remote = flag.clone();
        let start = Instant::now();
        let stopper = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            remote.store(false, Ordering::Release);
        });
        assert_eq!(wait(30.0, &*flag), WaitOutcome::Deactivated);
        assert!(start.elapsed() < Duration::from_secs(10));
        stopper.join().unwrap();
    }

    #[test]
    fn test_huge_budget_does_not_panic() {
        assert_eq!(wait(f64::INFINITY, &|| false), WaitOutcome::Deactivated);
    }
}
