//! Interval Machine: runs one interval to completion.
//!
//! The machine is `running` from construction, counts accepted clock ticks
//! into `elapsed`, and falls into `complete` the moment `elapsed` reaches
//! `duration`. While `running` it owns a [`ClockService`](crate::clock::ClockService);
//! any exit from `running` releases that clock.
//!
//! # Example
//!
//! ```rust
//! use metronome::builder::IntervalBuilder;
//! use metronome::clock::ManualScheduler;
//! use metronome::interval::{IntervalEvent, IntervalState};
//!
//! let scheduler = ManualScheduler::new();
//! let mut interval = IntervalBuilder::new(2)
//!     .scheduler(scheduler.clone())
//!     .build()
//!     .unwrap();
//!
//! for _ in 0..2 {
//!     let id = scheduler.current().unwrap();
//!     interval.handle(IntervalEvent::Tick(id));
//! }
//!
//! assert_eq!(interval.state(), IntervalState::Complete);
//! assert_eq!(scheduler.active_count(), 0);
//! ```

mod machine;

pub use machine::IntervalMachine;

use crate::clock::ClockId;
use serde::{Deserialize, Serialize};

crate::state_enum! {
    /// Lifecycle of a single interval.
    pub enum IntervalState {
        Running => "running",
        Paused => "paused",
        Complete => "complete",
    }
    final: [Complete]
}

/// Progress of one interval.
///
/// `elapsed <= duration` holds at all times.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalContext {
    pub elapsed: u64,
    pub duration: u64,
    pub tick_size: u64,
}

impl IntervalContext {
    /// Fresh context with nothing elapsed.
    pub fn new(duration: u64, tick_size: u64) -> Self {
        Self {
            elapsed: 0,
            duration,
            tick_size,
        }
    }

    /// Guard of the `running -> complete` automatic transition.
    pub fn is_complete(&self) -> bool {
        self.elapsed == self.duration
    }

    pub fn remaining(&self) -> u64 {
        self.duration - self.elapsed
    }
}

/// Events an interval reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntervalEvent {
    /// A clock tick, tagged with the activation that produced it
    Tick(ClockId),
    Pause,
    Resume,
}

impl IntervalEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Tick(_) => "TICK",
            Self::Pause => "PAUSE",
            Self::Resume => "RESUME",
        }
    }
}

/// Messages an invoked interval posts to its owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntervalNotice {
    /// One accepted tick was counted
    Ticked { elapsed: u64 },
    /// The interval reached `complete`
    Done { elapsed: u64 },
}

/// Read-only view of an interval, embedded in sequence snapshots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalSnapshot {
    pub name: String,
    pub state: IntervalState,
    pub elapsed: u64,
    pub duration: u64,
    pub remaining: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::State;

    #[test]
    fn state_names_match_statechart_labels() {
        assert_eq!(IntervalState::Running.name(), "running");
        assert_eq!(IntervalState::Paused.name(), "paused");
        assert_eq!(IntervalState::Complete.name(), "complete");
        assert!(IntervalState::Complete.is_final());
        assert!(!IntervalState::Paused.is_final());
    }

    #[test]
    fn zero_duration_context_is_complete() {
        assert!(IntervalContext::new(0, 1).is_complete());
        assert!(!IntervalContext::new(3, 1).is_complete());
    }

    #[test]
    fn remaining_counts_down() {
        let ctx = IntervalContext {
            elapsed: 2,
            duration: 5,
            tick_size: 1,
        };
        assert_eq!(ctx.remaining(), 3);
    }

    #[test]
    fn event_names() {
        assert_eq!(IntervalEvent::Tick(ClockId(1)).name(), "TICK");
        assert_eq!(IntervalEvent::Pause.name(), "PAUSE");
        assert_eq!(IntervalEvent::Resume.name(), "RESUME");
    }
}
