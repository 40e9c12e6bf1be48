//! Metronome: a composite countdown timer built from nested state machines.
//!
//! An outer sequence machine walks an ordered list of named intervals. For
//! each one it invokes an inner interval machine, which counts ticks from a
//! clock service until the interval is used up. Ticks and completion flow up
//! through a notice channel; commands and child lifecycles flow down.
//!
//! # Core Concepts
//!
//! - **State**: Typed state tags via the `State` trait and `state_enum!`
//! - **Automatic transitions**: Guarded eventless moves, re-checked after every mutation
//! - **Clock Service**: Scoped periodic timers behind the `Scheduler` trait
//! - **History**: Immutable tracking of committed transitions
//!
//! Every event is handled to completion before the next one is accepted.
//!
//! # Example
//!
//! ```rust
//! use metronome::builder::SequenceBuilder;
//! use metronome::clock::ManualScheduler;
//! use metronome::sequence::{SequenceEvent, SequenceState};
//!
//! let scheduler = ManualScheduler::new();
//! let mut timer = SequenceBuilder::new()
//!     .interval("Int 1", 3)
//!     .interval("Int 2", 5)
//!     .scheduler(scheduler.clone())
//!     .build()
//!     .unwrap();
//!
//! timer.send(SequenceEvent::Start);
//! while let Some(clock) = scheduler.current() {
//!     timer.send(SequenceEvent::Tick(clock));
//! }
//!
//! assert_eq!(timer.state(), SequenceState::Complete);
//! assert_eq!(timer.context().cursor, 2);
//! assert_eq!(timer.context().elapsed, 8);
//! ```

pub mod builder;
pub mod clock;
pub mod config;
pub mod core;
pub mod interval;
pub mod runtime;
pub mod sequence;

// Re-export commonly used types
pub use builder::{BuildError, SequenceBuilder};
pub use config::TimerConfig;
pub use crate::core::{State, StateHistory, StateTransition};
pub use runtime::{Command, Runtime, RuntimeError, RuntimeHandle};
pub use sequence::{SequenceEvent, SequenceMachine, SequenceState, Snapshot};
