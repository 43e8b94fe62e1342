//! Timer trigger for reconciliation passes.
//!
//! A pass is due on every tick that is a multiple of the interval, the
//! same rule the host uses for its other throttled systems. An interval
//! of `0` disables the timer.

use crate::host::HostClock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSchedule {
    interval: u64,
}

impl TickSchedule {
    pub fn new(interval: u64) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> u64 {
        self.interval
    }

    /// Whether `tick` falls on the interval.
    pub fn is_due(&self, tick: u64) -> bool {
        if self.interval == 0 {
            return false;
        }
        tick.is_multiple_of(self.interval)
    }

    /// Whether a timer pass should run now on `clock`.
    pub fn should_run(&self, clock: &dyn HostClock) -> bool {
        self.is_due(clock.ticks()) && clock.can_run()
    }
}
