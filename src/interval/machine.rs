//! Interval machine execution.

use super::{IntervalContext, IntervalEvent, IntervalNotice, IntervalState};
use crate::clock::{ClockId, ClockService, Scheduler};
use crate::core::{AutomaticTable, StateHistory, StateTransition};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// A single running interval.
///
/// Construct one through [`IntervalBuilder`](crate::builder::IntervalBuilder)
/// or let a [`SequenceMachine`](crate::sequence::SequenceMachine) invoke it.
pub struct IntervalMachine {
    state: IntervalState,
    context: IntervalContext,
    clock: Option<ClockService>,
    scheduler: Arc<dyn Scheduler>,
    tick_period: Duration,
    owner: Option<mpsc::UnboundedSender<IntervalNotice>>,
    automatic: AutomaticTable<IntervalState, IntervalContext>,
    history: StateHistory<IntervalState>,
    ticks: u64,
}

impl IntervalMachine {
    /// Enter `running` with `context`, reporting to `owner` if given.
    ///
    /// A context that is already complete (zero duration) settles into
    /// `complete` before any clock is activated.
    pub(crate) fn launch(
        context: IntervalContext,
        scheduler: Arc<dyn Scheduler>,
        tick_period: Duration,
        owner: Option<mpsc::UnboundedSender<IntervalNotice>>,
    ) -> Self {
        let automatic = AutomaticTable::new().with(
            IntervalState::Running,
            IntervalState::Complete,
            IntervalContext::is_complete,
        );

        let mut machine = Self {
            state: IntervalState::Running,
            context,
            clock: None,
            scheduler,
            tick_period,
            owner,
            automatic,
            history: StateHistory::new(),
            ticks: 0,
        };
        debug!(duration = context.duration, "Interval started");
        machine.settle();
        machine.enter();
        machine
    }

    /// Process one event to completion.
    ///
    /// Returns `false` when the event had no handler in the current state or
    /// was a tick from a clock that is no longer live.
    pub fn handle(&mut self, event: IntervalEvent) -> bool {
        match (self.state, event) {
            (IntervalState::Running, IntervalEvent::Tick(id)) => self.on_tick(id),
            (IntervalState::Running, IntervalEvent::Pause) => {
                self.transition(IntervalState::Paused, event.name());
                true
            }
            (IntervalState::Paused, IntervalEvent::Resume) => {
                self.transition(IntervalState::Running, event.name());
                true
            }
            (state, event) => {
                trace!(%state, event = event.name(), "Event ignored");
                false
            }
        }
    }

    fn on_tick(&mut self, id: ClockId) -> bool {
        if !self.clock.as_ref().is_some_and(|clock| clock.accepts(id)) {
            trace!(clock = %id, "Stale tick discarded");
            return false;
        }

        let next = self.context.elapsed + self.context.tick_size;
        self.context.elapsed = next.min(self.context.duration);
        self.ticks += 1;
        trace!(
            elapsed = self.context.elapsed,
            duration = self.context.duration,
            "Tick counted"
        );
        self.notify(IntervalNotice::Ticked {
            elapsed: self.context.elapsed,
        });

        if self.settle() {
            self.enter();
        }
        true
    }

    fn transition(&mut self, target: IntervalState, event: &str) {
        self.commit(target, event);
        self.settle();
        self.enter();
    }

    /// Fire automatic transitions until none applies.
    fn settle(&mut self) -> bool {
        let mut moved = false;
        while let Some(next) = self.automatic.next(&self.state, &self.context) {
            self.commit(next, "always");
            moved = true;
        }
        moved
    }

    /// Exit the current state and switch to `target`.
    fn commit(&mut self, target: IntervalState, event: &str) {
        let from = std::mem::replace(&mut self.state, target);
        if from == IntervalState::Running {
            // Dropping the service cancels its timer.
            self.clock = None;
        }
        self.history = self
            .history
            .record(StateTransition::now(from, target, event));
        debug!(%from, to = %target, event, elapsed = self.context.elapsed, "Interval transition");
    }

    /// Entry actions of the settled state.
    fn enter(&mut self) {
        match self.state {
            IntervalState::Running => {
                if self.clock.is_none() {
                    self.clock = Some(ClockService::activate(
                        self.scheduler.as_ref(),
                        self.tick_period,
                    ));
                }
            }
            IntervalState::Complete => {
                self.notify(IntervalNotice::Done {
                    elapsed: self.context.elapsed,
                });
            }
            IntervalState::Paused => {}
        }
    }

    fn notify(&mut self, notice: IntervalNotice) {
        if let Some(owner) = &self.owner {
            if owner.send(notice).is_err() {
                debug!("Owner went away, severing notice channel");
                self.owner = None;
            }
        }
    }

    pub fn state(&self) -> IntervalState {
        self.state
    }

    pub fn context(&self) -> &IntervalContext {
        &self.context
    }

    pub fn elapsed(&self) -> u64 {
        self.context.elapsed
    }

    pub fn is_final(&self) -> bool {
        self.state == IntervalState::Complete
    }

    /// Id of the live clock, `None` unless running.
    pub fn clock_id(&self) -> Option<ClockId> {
        self.clock.as_ref().and_then(ClockService::id)
    }

    /// Number of ticks counted so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn history(&self) -> &StateHistory<IntervalState> {
        &self.history
    }
}

impl std::fmt::Debug for IntervalMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntervalMachine")
            .field("state", &self.state)
            .field("context", &self.context)
            .field("clock", &self.clock)
            .finish()
    }
}
