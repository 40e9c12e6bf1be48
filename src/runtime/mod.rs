//! Runtime driver.
//!
//! Owns a [`SequenceMachine`] backed by the [`TokioScheduler`] and feeds it,
//! one event at a time, with clock ticks and commands arriving on channels.
//! Each event is handled to completion before the next one is received.

pub mod error;

pub use error::RuntimeError;

use crate::clock::{ClockId, TokioScheduler};
use crate::config::TimerConfig;
use crate::core::State;
use crate::sequence::{SequenceEvent, SequenceMachine, SequenceState, Snapshot};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

/// External commands accepted by a running timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Resume,
}

impl From<Command> for SequenceEvent {
    fn from(command: Command) -> Self {
        match command {
            Command::Start => SequenceEvent::Start,
            Command::Pause => SequenceEvent::Pause,
            Command::Resume => SequenceEvent::Resume,
        }
    }
}

/// Cloneable sender of commands into a [`Runtime`].
#[derive(Clone, Debug)]
pub struct RuntimeHandle {
    commands: mpsc::UnboundedSender<Command>,
}

impl RuntimeHandle {
    pub fn send(&self, command: Command) -> Result<(), RuntimeError> {
        self.commands
            .send(command)
            .map_err(|_| RuntimeError::ShutDown)
    }

    pub fn start(&self) -> Result<(), RuntimeError> {
        self.send(Command::Start)
    }

    pub fn pause(&self) -> Result<(), RuntimeError> {
        self.send(Command::Pause)
    }

    pub fn resume(&self) -> Result<(), RuntimeError> {
        self.send(Command::Resume)
    }
}

/// Event loop driving one run of a sequence.
pub struct Runtime {
    machine: SequenceMachine,
    ticks: mpsc::UnboundedReceiver<ClockId>,
    commands: mpsc::UnboundedReceiver<Command>,
    run_id: Uuid,
}

impl Runtime {
    /// Build a runtime for `config`. Nothing ticks until `Start` is sent and
    /// [`run`](Self::run) is awaited inside a tokio runtime.
    pub fn new(config: &TimerConfig) -> Result<(Self, RuntimeHandle), RuntimeError> {
        let (scheduler, ticks) = TokioScheduler::new();
        let machine = config.build(Arc::new(scheduler))?;
        let (commands_tx, commands) = mpsc::unbounded_channel();

        let runtime = Self {
            machine,
            ticks,
            commands,
            run_id: Uuid::new_v4(),
        };
        Ok((runtime, RuntimeHandle { commands: commands_tx }))
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn machine(&self) -> &SequenceMachine {
        &self.machine
    }

    /// Register an observer for every committed transition.
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(&Snapshot) + Send + 'static,
    {
        self.machine.subscribe(observer);
    }

    /// Drive the sequence until it completes and return its final snapshot.
    ///
    /// Observers first receive the initial `ready` snapshot.
    pub async fn run(self) -> Result<Snapshot, RuntimeError> {
        let span = info_span!("run", id = %self.run_id);
        self.drive().instrument(span).await
    }

    async fn drive(mut self) -> Result<Snapshot, RuntimeError> {
        info!(
            intervals = self.machine.context().intervals.len(),
            total = self.machine.context().total_duration(),
            "Runtime started"
        );
        self.machine.publish();

        let mut commands_open = true;
        while !self.machine.is_final() {
            tokio::select! {
                Some(id) = self.ticks.recv() => {
                    self.machine.send(SequenceEvent::Tick(id));
                }
                command = self.commands.recv(), if commands_open => match command {
                    Some(command) => {
                        if !self.machine.send(command.into()) {
                            warn!(?command, state = %self.machine.state(), "Command ignored");
                        }
                    }
                    None => {
                        commands_open = false;
                        // Only a running sequence holds a clock; anything else would wait forever.
                        if self.machine.state() != SequenceState::Running {
                            warn!(state = %self.machine.state(), "Command channel closed");
                            return Err(RuntimeError::CommandsClosed);
                        }
                    }
                },
                else => return Err(RuntimeError::ShutDown),
            }
        }

        let history = self.machine.history();
        let path: Vec<&str> = history.get_path().into_iter().map(|s| s.name()).collect();
        info!(
            elapsed = self.machine.context().elapsed,
            pauses = history.entries_into(&SequenceState::Paused),
            wall = ?history.duration(),
            path = ?path,
            "Runtime finished"
        );
        Ok(self.machine.snapshot())
    }
}
