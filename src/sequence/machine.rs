//! Sequence machine execution.

use super::{IntervalSpec, SequenceContext, SequenceEvent, SequenceState, Snapshot};
use crate::clock::{ClockId, Scheduler};
use crate::core::{AutomaticTable, State, StateHistory, StateTransition};
use crate::interval::{
    IntervalContext, IntervalEvent, IntervalMachine, IntervalNotice, IntervalSnapshot,
    IntervalState,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, trace};

/// Callback receiving a snapshot after every handled event.
pub type Observer = Box<dyn FnMut(&Snapshot) + Send>;

/// A child interval together with the receiving end of its notice channel.
struct Invocation {
    machine: IntervalMachine,
    notices: mpsc::UnboundedReceiver<IntervalNotice>,
}

/// Runs a list of intervals one after another.
///
/// Build one with [`SequenceBuilder`](crate::builder::SequenceBuilder).
pub struct SequenceMachine {
    state: SequenceState,
    context: SequenceContext,
    child: Option<Invocation>,
    scheduler: Arc<dyn Scheduler>,
    tick_period: Duration,
    automatic: AutomaticTable<SequenceState, SequenceContext>,
    history: StateHistory<SequenceState>,
    observers: Vec<Observer>,
}

impl SequenceMachine {
    pub(crate) fn new(
        intervals: Vec<IntervalSpec>,
        tick_size: u64,
        scheduler: Arc<dyn Scheduler>,
        tick_period: Duration,
    ) -> Self {
        let automatic = AutomaticTable::new().with(
            SequenceState::Running,
            SequenceState::Complete,
            SequenceContext::all_intervals_complete,
        );

        Self {
            state: SequenceState::Ready,
            context: SequenceContext::new(intervals, tick_size),
            child: None,
            scheduler,
            tick_period,
            automatic,
            history: StateHistory::new(),
            observers: Vec::new(),
        }
    }

    /// Register an observer. It is called synchronously once per handled
    /// event, after the event has been fully processed.
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(&Snapshot) + Send + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// Process one event to completion, including every notice the child
    /// posts and every automatic transition they trigger.
    ///
    /// Returns `false` if the event was ignored; observers are not notified
    /// in that case.
    pub fn send(&mut self, event: SequenceEvent) -> bool {
        let handled = match (self.state, event) {
            (SequenceState::Ready, SequenceEvent::Start) => {
                self.commit(SequenceState::Running, event.name());
                self.settle();
                self.enter();
                self.pump();
                true
            }
            (SequenceState::Running, SequenceEvent::Tick(id)) => {
                self.forward(IntervalEvent::Tick(id))
            }
            (SequenceState::Running, SequenceEvent::Pause) => {
                self.commit(SequenceState::Paused, event.name());
                self.forward(IntervalEvent::Pause);
                true
            }
            (SequenceState::Paused, SequenceEvent::Resume) => {
                self.commit(SequenceState::Running, event.name());
                self.forward(IntervalEvent::Resume);
                true
            }
            (state, event) => {
                trace!(%state, event = event.name(), "Event ignored");
                false
            }
        };

        if handled {
            self.publish();
        }
        handled
    }

    /// Hand an event to the child and drain what it reports back.
    fn forward(&mut self, event: IntervalEvent) -> bool {
        let handled = match self.child.as_mut() {
            Some(invocation) => invocation.machine.handle(event),
            None => false,
        };
        self.pump();
        handled
    }

    /// Drain child notices in order. A `Done` notice swaps in the next child,
    /// whose own notices are drained by the same loop.
    fn pump(&mut self) {
        loop {
            let notice = match self.child.as_mut() {
                Some(invocation) => match invocation.notices.try_recv() {
                    Ok(notice) => notice,
                    Err(_) => break,
                },
                None => break,
            };
            self.on_notice(notice);
        }
    }

    fn on_notice(&mut self, notice: IntervalNotice) {
        match notice {
            IntervalNotice::Ticked { .. } => {
                self.context.elapsed += self.context.tick_size;
                trace!(elapsed = self.context.elapsed, "Aggregate tick");
            }
            IntervalNotice::Done { elapsed } => {
                if let Some(spec) = self.context.current() {
                    info!(interval = %spec.name, elapsed, "Interval complete");
                }
                self.context.cursor += 1;
                // Re-entering `running` exits it first: the finished child goes.
                self.child = None;
                self.commit(SequenceState::Running, "DONE");
                self.settle();
                self.enter();
            }
        }
    }

    /// Fire automatic transitions until none applies.
    fn settle(&mut self) {
        while let Some(next) = self.automatic.next(&self.state, &self.context) {
            self.commit(next, "always");
        }
    }

    fn commit(&mut self, target: SequenceState, event: &str) {
        let from = std::mem::replace(&mut self.state, target);
        if target.is_final() {
            // Leaving the active region tears the child down.
            self.child = None;
        }
        self.history = self
            .history
            .record(StateTransition::now(from, target, event));
        debug!(
            %from,
            to = %target,
            event,
            cursor = self.context.cursor,
            elapsed = self.context.elapsed,
            "Sequence transition"
        );
    }

    /// Entry actions of the settled state.
    fn enter(&mut self) {
        match self.state {
            SequenceState::Running if self.child.is_none() => self.invoke(),
            SequenceState::Complete => {
                info!(
                    elapsed = self.context.elapsed,
                    intervals = self.context.intervals.len(),
                    "Sequence complete"
                );
            }
            _ => {}
        }
    }

    fn invoke(&mut self) {
        let Some(spec) = self.context.current() else {
            return;
        };
        let (tx, rx) = mpsc::unbounded_channel();
        info!(interval = %spec.name, duration = spec.duration, cursor = self.context.cursor, "Starting interval");
        let machine = IntervalMachine::launch(
            IntervalContext::new(spec.duration, self.context.tick_size),
            Arc::clone(&self.scheduler),
            self.tick_period,
            Some(tx),
        );
        self.child = Some(Invocation {
            machine,
            notices: rx,
        });
    }

    pub(crate) fn publish(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for observer in &mut self.observers {
            observer(&snapshot);
        }
    }

    /// Current state and context as a serializable value.
    pub fn snapshot(&self) -> Snapshot {
        let current = match (&self.child, self.context.current()) {
            (Some(invocation), Some(spec)) => {
                let ctx = invocation.machine.context();
                Some(IntervalSnapshot {
                    name: spec.name.clone(),
                    state: invocation.machine.state(),
                    elapsed: ctx.elapsed,
                    duration: ctx.duration,
                    remaining: ctx.remaining(),
                })
            }
            _ => None,
        };

        Snapshot {
            state: self.state,
            cursor: self.context.cursor,
            elapsed: self.context.elapsed,
            total_duration: self.context.total_duration(),
            intervals: self.context.intervals.clone(),
            current,
        }
    }

    pub fn state(&self) -> SequenceState {
        self.state
    }

    pub fn context(&self) -> &SequenceContext {
        &self.context
    }

    pub fn is_final(&self) -> bool {
        self.state == SequenceState::Complete
    }

    /// Clock of the active interval, if one is ticking.
    pub fn active_clock(&self) -> Option<ClockId> {
        self.child.as_ref().and_then(|c| c.machine.clock_id())
    }

    /// State of the active interval, if one is alive.
    pub fn child_state(&self) -> Option<IntervalState> {
        self.child.as_ref().map(|c| c.machine.state())
    }

    pub fn history(&self) -> &StateHistory<SequenceState> {
        &self.history
    }
}

impl std::fmt::Debug for SequenceMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequenceMachine")
            .field("state", &self.state)
            .field("context", &self.context)
            .field("child", &self.child.as_ref().map(|c| &c.machine))
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualScheduler;
    use std::sync::Mutex;

    fn sequence(durations: &[u64]) -> (SequenceMachine, ManualScheduler) {
        let scheduler = ManualScheduler::new();
        let intervals = durations
            .iter()
            .enumerate()
            .map(|(i, d)| IntervalSpec::new(format!("Int {}", i + 1), *d))
            .collect();
        let machine = SequenceMachine::new(
            intervals,
            1,
            Arc::new(scheduler.clone()),
            Duration::from_secs(1),
        );
        (machine, scheduler)
    }

    fn run_to_end(machine: &mut SequenceMachine, scheduler: &ManualScheduler) -> usize {
        let mut ticks = 0;
        while let Some(id) = scheduler.current() {
            assert!(machine.send(SequenceEvent::Tick(id)));
            ticks += 1;
        }
        ticks
    }

    #[test]
    fn starts_ready_without_child() {
        let (machine, scheduler) = sequence(&[3, 5]);

        assert_eq!(machine.state(), SequenceState::Ready);
        assert!(machine.child_state().is_none());
        assert_eq!(scheduler.started_count(), 0);
    }

    #[test]
    fn start_invokes_first_interval() {
        let (mut machine, scheduler) = sequence(&[3, 5]);

        assert!(machine.send(SequenceEvent::Start));

        assert_eq!(machine.state(), SequenceState::Running);
        assert_eq!(machine.child_state(), Some(IntervalState::Running));
        assert_eq!(machine.active_clock(), scheduler.current());
    }

    #[test]
    fn runs_both_intervals_and_accumulates_elapsed() {
        let (mut machine, scheduler) = sequence(&[3, 5]);
        machine.send(SequenceEvent::Start);

        let ticks = run_to_end(&mut machine, &scheduler);

        assert_eq!(ticks, 8);
        assert_eq!(machine.state(), SequenceState::Complete);
        assert_eq!(machine.context().cursor, 2);
        assert_eq!(machine.context().elapsed, 8);
        assert!(machine.child_state().is_none());
        assert_eq!(scheduler.active_count(), 0);
        assert_eq!(scheduler.peak_active(), 1);
    }

    #[test]
    fn observers_see_one_snapshot_per_handled_event() {
        let (mut machine, scheduler) = sequence(&[3, 5]);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        machine.subscribe(move |s: &Snapshot| sink.lock().unwrap().push(s.elapsed));

        machine.send(SequenceEvent::Start);
        run_to_end(&mut machine, &scheduler);

        assert_eq!(*seen.lock().unwrap(), (0..=8).collect::<Vec<u64>>());
    }

    #[test]
    fn empty_sequence_completes_on_start() {
        let (mut machine, scheduler) = sequence(&[]);

        assert!(machine.send(SequenceEvent::Start));

        assert_eq!(machine.state(), SequenceState::Complete);
        assert_eq!(machine.context().elapsed, 0);
        assert_eq!(scheduler.started_count(), 0);
    }

    #[test]
    fn second_start_is_ignored() {
        let (mut machine, scheduler) = sequence(&[2]);
        machine.send(SequenceEvent::Start);
        let clock = machine.active_clock();

        assert!(!machine.send(SequenceEvent::Start));
        assert_eq!(machine.active_clock(), clock);
        assert_eq!(scheduler.started_count(), 1);
    }

    #[test]
    fn zero_length_intervals_are_skipped_in_one_step() {
        let (mut machine, scheduler) = sequence(&[0, 2, 0]);
        machine.send(SequenceEvent::Start);

        assert_eq!(machine.context().cursor, 1);
        assert_eq!(machine.child_state(), Some(IntervalState::Running));

        let ticks = run_to_end(&mut machine, &scheduler);
        assert_eq!(ticks, 2);
        assert_eq!(machine.state(), SequenceState::Complete);
        assert_eq!(machine.context().cursor, 3);
    }

    #[test]
    fn pause_keeps_child_and_releases_clock() {
        let (mut machine, scheduler) = sequence(&[3]);
        machine.send(SequenceEvent::Start);
        let id = scheduler.current().unwrap();
        machine.send(SequenceEvent::Tick(id));

        assert!(machine.send(SequenceEvent::Pause));
        assert_eq!(machine.state(), SequenceState::Paused);
        assert_eq!(machine.child_state(), Some(IntervalState::Paused));
        assert_eq!(scheduler.active_count(), 0);

        assert!(!machine.send(SequenceEvent::Tick(id)));
        assert_eq!(machine.context().elapsed, 1);

        assert!(machine.send(SequenceEvent::Resume));
        assert_eq!(machine.child_state(), Some(IntervalState::Running));
        assert_eq!(run_to_end(&mut machine, &scheduler), 2);
        assert_eq!(machine.context().elapsed, 3);
    }

    #[test]
    fn commands_after_complete_are_ignored() {
        let (mut machine, _scheduler) = sequence(&[]);
        machine.send(SequenceEvent::Start);

        assert!(!machine.send(SequenceEvent::Pause));
        assert!(!machine.send(SequenceEvent::Resume));
        assert!(!machine.send(SequenceEvent::Start));
    }

    #[test]
    fn history_records_each_interval_handover() {
        let (mut machine, scheduler) = sequence(&[1, 1]);
        machine.send(SequenceEvent::Start);
        run_to_end(&mut machine, &scheduler);

        let events: Vec<&str> = machine
            .history()
            .transitions()
            .iter()
            .map(|t| t.event.as_str())
            .collect();
        assert_eq!(events, vec!["START", "DONE", "DONE", "always"]);
    }

    #[test]
    fn snapshot_describes_active_interval() {
        let (mut machine, scheduler) = sequence(&[3, 5]);
        machine.send(SequenceEvent::Start);
        let id = scheduler.current().unwrap();
        machine.send(SequenceEvent::Tick(id));

        let snapshot = machine.snapshot();
        let current = snapshot.current.expect("active interval");
        assert_eq!(current.name, "Int 1");
        assert_eq!(current.elapsed, 1);
        assert_eq!(current.remaining, 2);
        assert_eq!(snapshot.total_duration, 8);
    }
}
