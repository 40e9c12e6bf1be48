//! Builder for standalone interval machines.

use super::{check, BuildError, DEFAULT_TICK_PERIOD, DEFAULT_TICK_SIZE};
use crate::clock::Scheduler;
use crate::interval::{IntervalContext, IntervalMachine};
use crate::sequence::IntervalSpec;
use std::sync::Arc;
use std::time::Duration;

/// Builder for an interval that runs on its own, without an owner.
pub struct IntervalBuilder {
    duration: u64,
    tick_size: u64,
    tick_period: Duration,
    scheduler: Option<Arc<dyn Scheduler>>,
}

impl IntervalBuilder {
    /// Start building an interval lasting `duration`.
    pub fn new(duration: u64) -> Self {
        Self {
            duration,
            tick_size: DEFAULT_TICK_SIZE,
            tick_period: DEFAULT_TICK_PERIOD,
            scheduler: None,
        }
    }

    /// Amount each tick adds to `elapsed`.
    pub fn tick_size(mut self, tick_size: u64) -> Self {
        self.tick_size = tick_size;
        self
    }

    /// Wall-clock period between ticks.
    pub fn tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    /// Set the scheduler that backs the clock (required).
    pub fn scheduler<S: Scheduler + 'static>(mut self, scheduler: S) -> Self {
        self.scheduler = Some(Arc::new(scheduler));
        self
    }

    /// Validate and start the interval. It is `running` on return, or already
    /// `complete` for a zero duration.
    pub fn build(self) -> Result<IntervalMachine, BuildError> {
        let spec = IntervalSpec::new("interval", self.duration);
        check(std::slice::from_ref(&spec), self.tick_size, self.tick_period)?;
        let scheduler = self.scheduler.ok_or(BuildError::MissingScheduler)?;

        Ok(IntervalMachine::launch(
            IntervalContext::new(self.duration, self.tick_size),
            scheduler,
            self.tick_period,
            None,
        ))
    }
}
