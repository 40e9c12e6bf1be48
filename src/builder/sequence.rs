//! Builder for sequence machines.

use super::{check, BuildError, DEFAULT_TICK_PERIOD, DEFAULT_TICK_SIZE};
use crate::clock::Scheduler;
use crate::sequence::{IntervalSpec, SequenceMachine};
use std::sync::Arc;
use std::time::Duration;

/// Builder for constructing a sequence with a fluent API.
pub struct SequenceBuilder {
    intervals: Vec<IntervalSpec>,
    tick_size: u64,
    tick_period: Duration,
    scheduler: Option<Arc<dyn Scheduler>>,
}

impl SequenceBuilder {
    /// Create a new builder with no intervals.
    pub fn new() -> Self {
        Self {
            intervals: Vec::new(),
            tick_size: DEFAULT_TICK_SIZE,
            tick_period: DEFAULT_TICK_PERIOD,
            scheduler: None,
        }
    }

    /// Append one interval.
    pub fn interval(mut self, name: impl Into<String>, duration: u64) -> Self {
        self.intervals.push(IntervalSpec::new(name, duration));
        self
    }

    /// Append several intervals at once.
    pub fn intervals(mut self, intervals: impl IntoIterator<Item = IntervalSpec>) -> Self {
        self.intervals.extend(intervals);
        self
    }

    pub fn tick_size(mut self, tick_size: u64) -> Self {
        self.tick_size = tick_size;
        self
    }

    pub fn tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    /// Set the scheduler shared by every interval of the run (required).
    pub fn scheduler<S: Scheduler + 'static>(self, scheduler: S) -> Self {
        self.shared_scheduler(Arc::new(scheduler))
    }

    /// Set an already shared scheduler.
    pub fn shared_scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Build the sequence in its `ready` state.
    /// Returns an error listing every configuration problem found.
    pub fn build(self) -> Result<SequenceMachine, BuildError> {
        check(&self.intervals, self.tick_size, self.tick_period)?;
        let scheduler = self.scheduler.ok_or(BuildError::MissingScheduler)?;

        Ok(SequenceMachine::new(
            self.intervals,
            self.tick_size,
            scheduler,
            self.tick_period,
        ))
    }
}

impl Default for SequenceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
