//! Sequence Machine: walks an ordered list of intervals.
//!
//! For every interval the sequence invokes a fresh
//! [`IntervalMachine`](crate::interval::IntervalMachine). The child reports
//! ticks and completion through its own notice channel; the sequence folds
//! ticks into an aggregate `elapsed` and advances its cursor when the child is
//! done. When the cursor runs off the end of the list the sequence completes.
//!
//! `running` and `paused` form one active region that owns the child.
//! Pausing the sequence pauses the child (releasing its clock) without
//! tearing it down.
//!
//! # Example
//!
//! ```rust
//! use metronome::builder::SequenceBuilder;
//! use metronome::clock::ManualScheduler;
//! use metronome::sequence::{SequenceEvent, SequenceState};
//!
//! let scheduler = ManualScheduler::new();
//! let mut sequence = SequenceBuilder::new()
//!     .interval("Warm up", 2)
//!     .interval("Sprint", 1)
//!     .scheduler(scheduler.clone())
//!     .build()
//!     .unwrap();
//!
//! sequence.send(SequenceEvent::Start);
//! while let Some(id) = scheduler.current() {
//!     sequence.send(SequenceEvent::Tick(id));
//! }
//!
//! assert_eq!(sequence.state(), SequenceState::Complete);
//! assert_eq!(sequence.context().elapsed, 3);
//! ```

mod machine;

pub use machine::{Observer, SequenceMachine};

use crate::clock::ClockId;
use crate::interval::IntervalSnapshot;
use serde::{Deserialize, Serialize};

crate::state_enum! {
    /// Lifecycle of a whole run.
    pub enum SequenceState {
        Ready => "ready",
        Running => "running",
        Paused => "paused",
        Complete => "complete",
    }
    final: [Complete]
}

/// One named interval of a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalSpec {
    pub name: String,
    /// Length in seconds
    pub duration: u64,
}

impl IntervalSpec {
    pub fn new(name: impl Into<String>, duration: u64) -> Self {
        Self {
            name: name.into(),
            duration,
        }
    }
}

/// Progress of a run.
///
/// `cursor <= intervals.len()`; the run is complete exactly when they are
/// equal. `elapsed` accumulates across intervals and is never reset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceContext {
    pub intervals: Vec<IntervalSpec>,
    pub cursor: usize,
    pub elapsed: u64,
    pub tick_size: u64,
}

impl SequenceContext {
    pub fn new(intervals: Vec<IntervalSpec>, tick_size: u64) -> Self {
        Self {
            intervals,
            cursor: 0,
            elapsed: 0,
            tick_size,
        }
    }

    /// Guard of the `running -> complete` automatic transition.
    pub fn all_intervals_complete(&self) -> bool {
        self.cursor == self.intervals.len()
    }

    /// Interval under the cursor, `None` once the run is over.
    pub fn current(&self) -> Option<&IntervalSpec> {
        self.intervals.get(self.cursor)
    }

    /// Sum of all interval durations, saturating at `u64::MAX`.
    pub fn total_duration(&self) -> u64 {
        self.intervals
            .iter()
            .fold(0u64, |total, i| total.saturating_add(i.duration))
    }

    pub fn remaining(&self) -> u64 {
        self.total_duration().saturating_sub(self.elapsed)
    }
}

/// Events accepted by the sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequenceEvent {
    Start,
    Pause,
    Resume,
    /// Clock tick, routed to the active interval
    Tick(ClockId),
}

impl SequenceEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "START",
            Self::Pause => "PAUSE",
            Self::Resume => "RESUME",
            Self::Tick(_) => "TICK",
        }
    }
}

/// What observers see after every handled event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub state: SequenceState,
    pub cursor: usize,
    pub elapsed: u64,
    pub total_duration: u64,
    pub intervals: Vec<IntervalSpec>,
    pub current: Option<IntervalSnapshot>,
}
