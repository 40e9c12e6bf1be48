//! Eventless (automatic) transitions.
//!
//! An automatic transition fires without an event as soon as its guard holds
//! for the machine context. Machines re-evaluate their table after every
//! mutation and on every state entry, looping until nothing fires.

use super::guard::Guard;
use super::state::State;

/// A guarded move from one state to another that needs no event.
pub struct Automatic<S: State, C> {
    pub from: S,
    pub to: S,
    pub guard: Guard<C>,
}

impl<S: State, C> Automatic<S, C> {
    /// Check if this transition fires from `current` given `context` (pure)
    pub fn can_fire(&self, current: &S, context: &C) -> bool {
        *current == self.from && self.guard.check(context)
    }
}

/// Ordered set of automatic transitions for one machine.
///
/// The first rule whose source matches and whose guard holds wins.
///
/// # Example
///
/// ```rust
/// use metronome::core::AutomaticTable;
/// use metronome::interval::{IntervalContext, IntervalState};
///
/// let table = AutomaticTable::new().with(
///     IntervalState::Running,
///     IntervalState::Complete,
///     |c: &IntervalContext| c.elapsed == c.duration,
/// );
///
/// let done = IntervalContext { elapsed: 3, duration: 3, tick_size: 1 };
/// assert_eq!(table.next(&IntervalState::Running, &done), Some(IntervalState::Complete));
/// assert_eq!(table.next(&IntervalState::Paused, &done), None);
/// ```
pub struct AutomaticTable<S: State, C> {
    rules: Vec<Automatic<S, C>>,
}

impl<S: State, C> AutomaticTable<S, C> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Add a rule, returning the extended table.
    pub fn with<F>(mut self, from: S, to: S, guard: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        self.rules.push(Automatic {
            from,
            to,
            guard: Guard::new(guard),
        });
        self
    }

    /// Target of the first rule that fires, if any.
    ///
    /// Final states never fire, which bounds the settle loop of every machine
    /// whose rules lead towards a final state.
    pub fn next(&self, current: &S, context: &C) -> Option<S> {
        if current.is_final() {
            return None;
        }
        self.rules
            .iter()
            .find(|rule| rule.can_fire(current, context))
            .map(|rule| rule.to.clone())
    }

    /// Number of rules in the table.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the table has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<S: State, C> Default for AutomaticTable<S, C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum Step {
        Waiting,
        Counting,
        Done,
    }

    impl State for Step {
        fn name(&self) -> &str {
            match self {
                Self::Waiting => "waiting",
                Self::Counting => "counting",
                Self::Done => "done",
            }
        }

        fn is_final(&self) -> bool {
            matches!(self, Self::Done)
        }
    }

    struct Counter {
        value: u32,
        target: u32,
    }

    #[test]
    fn rule_requires_matching_source() {
        let table = AutomaticTable::new().with(Step::Counting, Step::Done, |c: &Counter| {
            c.value == c.target
        });
        let ctx = Counter {
            value: 2,
            target: 2,
        };

        assert_eq!(table.next(&Step::Counting, &ctx), Some(Step::Done));
        assert_eq!(table.next(&Step::Waiting, &ctx), None);
    }

    #[test]
    fn rule_requires_guard() {
        let table = AutomaticTable::new().with(Step::Counting, Step::Done, |c: &Counter| {
            c.value == c.target
        });
        let ctx = Counter {
            value: 1,
            target: 2,
        };

        assert_eq!(table.next(&Step::Counting, &ctx), None);
    }

    #[test]
    fn first_matching_rule_wins() {
        let table = AutomaticTable::new()
            .with(Step::Waiting, Step::Counting, |c: &Counter| c.target > 0)
            .with(Step::Waiting, Step::Done, |_: &Counter| true);

        let ctx = Counter {
            value: 0,
            target: 3,
        };
        assert_eq!(table.next(&Step::Waiting, &ctx), Some(Step::Counting));

        let empty = Counter {
            value: 0,
            target: 0,
        };
        assert_eq!(table.next(&Step::Waiting, &empty), Some(Step::Done));
    }

    #[test]
    fn final_states_never_fire() {
        let table = AutomaticTable::new().with(Step::Done, Step::Waiting, |_: &Counter| true);
        let ctx = Counter {
            value: 0,
            target: 0,
        };

        assert_eq!(table.next(&Step::Done, &ctx), None);
        assert_eq!(table.len(), 1);
        assert!(!table.is_empty());
    }
}
