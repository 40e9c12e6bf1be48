//! Core state machine building blocks.
//!
//! This module holds the machine-independent pieces:
//! - State tags via the `State` trait and the `state_enum!` macro
//! - Guard predicates over machine context
//! - Automatic (eventless) transition tables
//! - Immutable history tracking
//!
//! Nothing in here touches clocks or channels.

mod guard;
mod history;
mod macros;
mod state;
mod transition;

pub use guard::Guard;
pub use history::{StateHistory, StateTransition};
pub use state::State;
pub use transition::{Automatic, AutomaticTable};
