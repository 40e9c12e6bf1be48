//! State transition history tracking.
//!
//! Every machine keeps an immutable log of the state changes it committed,
//! tagged with the event that caused each one.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single committed state change.
///
/// Internal actions that leave the state untouched (a tick inside `Running`)
/// are not recorded; re-entering the same state is.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State> {
    /// The state being left
    pub from: S,
    /// The state being entered
    pub to: S,
    /// When the transition was committed
    pub timestamp: DateTime<Utc>,
    /// Name of the event that caused it (`"always"` for automatic transitions)
    pub event: String,
}

impl<S: State> StateTransition<S> {
    /// Build a transition stamped with the current time.
    pub fn now(from: S, to: S, event: impl Into<String>) -> Self {
        Self {
            from,
            to,
            timestamp: Utc::now(),
            event: event.into(),
        }
    }
}

/// Ordered history of state transitions.
///
/// `record` returns a new history with the transition appended; the original
/// is left unchanged.
///
/// # Example
///
/// ```rust
/// use metronome::core::{StateHistory, StateTransition};
/// use metronome::interval::IntervalState;
///
/// let history = StateHistory::new()
///     .record(StateTransition::now(IntervalState::Running, IntervalState::Paused, "PAUSE"))
///     .record(StateTransition::now(IntervalState::Paused, IntervalState::Running, "RESUME"));
///
/// let path = history.get_path();
/// assert_eq!(
///     path,
///     vec![&IntervalState::Running, &IntervalState::Paused, &IntervalState::Running]
/// );
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    transitions: Vec<StateTransition<S>>,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateHistory<S> {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    pub fn record(&self, transition: StateTransition<S>) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// Get the path of states traversed.
    ///
    /// Returns the `from` state of the first transition followed by the `to`
    /// state of every transition.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Wall-clock span between the first and last recorded transition.
    ///
    /// Returns `None` for an empty history.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// Most recent transition, if any.
    pub fn last(&self) -> Option<&StateTransition<S>> {
        self.transitions.last()
    }

    /// Get all transitions.
    pub fn transitions(&self) -> &[StateTransition<S>] {
        &self.transitions
    }

    /// Number of transitions entering `state`.
    pub fn entries_into(&self, state: &S) -> usize {
        self.transitions.iter().filter(|t| &t.to == state).count()
    }
}
