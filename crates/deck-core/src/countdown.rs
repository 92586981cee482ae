use crate::constants::COUNTDOWN_QUANTUM;
use crate::error::Result;
use crate::platform::{Scheduler, TimerId};
use std::time::Duration;

/// Outcome of a delivered countdown tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    /// The clock was not running; the tick is stale and must be ignored.
    Idle,
    Remaining(Duration),
    /// Remaining time hit zero. The clock has already stopped itself.
    Expired,
}

/// Wall-clock countdown driven by a host interval.
///
/// Each delivered tick removes one second. `Stopped` means no interval is
/// pending with the scheduler.
#[derive(Debug)]
pub struct Countdown {
    interval: Duration,
    remaining: Duration,
    timer: Option<TimerId>,
}

impl Countdown {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            remaining: Duration::ZERO,
            timer: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Start counting down from `initial`. Returns `false` without scheduling
    /// anything when there is no time to count.
    pub fn start<S: Scheduler>(&mut self, scheduler: &mut S, initial: Duration) -> Result<bool> {
        self.stop(scheduler);
        if initial.is_zero() {
            self.remaining = Duration::ZERO;
            return Ok(false);
        }
        let id = scheduler.start_interval(self.interval)?;
        self.remaining = initial;
        self.timer = Some(id);
        log::debug!("[countdown] start remaining={:?} timer={:?}", initial, id);
        Ok(true)
    }

    pub fn tick<S: Scheduler>(&mut self, scheduler: &mut S) -> Tick {
        if self.timer.is_none() {
            return Tick::Idle;
        }
        self.remaining = self.remaining.saturating_sub(COUNTDOWN_QUANTUM);
        if self.remaining.is_zero() {
            self.stop(scheduler);
            log::debug!("[countdown] expired");
            return Tick::Expired;
        }
        Tick::Remaining(self.remaining)
    }

    pub fn stop<S: Scheduler>(&mut self, scheduler: &mut S) {
        if let Some(id) = self.timer.take() {
            scheduler.cancel_interval(id);
            log::debug!("[countdown] stop timer={:?}", id);
        }
    }
}
