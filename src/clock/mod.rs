//! Clock Service: the periodic tick source behind every running interval.
//!
//! Timers sit behind the [`Scheduler`] trait so that the machines never touch
//! wall-clock time directly. Production code uses [`TokioScheduler`]; tests
//! drive ticks by hand through [`ManualScheduler`].
//!
//! A [`ClockService`] is a scoped acquisition: activating it starts a timer,
//! and deactivating or dropping it cancels that timer. Every activation gets
//! a fresh [`ClockId`], so a tick that was already in flight when its clock
//! was cancelled is recognised as stale and discarded.

mod manual;
mod tokio_scheduler;

pub use manual::ManualScheduler;
pub use tokio_scheduler::TokioScheduler;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Identifier of one clock activation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct ClockId(pub u64);

impl fmt::Display for ClockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "clock-{}", self.0)
    }
}

/// A running periodic timer.
pub trait Timer: Send {
    /// Identifier carried by every tick this timer emits.
    fn id(&self) -> ClockId;

    /// Stop emitting ticks. Calling this more than once is a no-op.
    fn cancel(&mut self);
}

/// Source of periodic timers.
pub trait Scheduler: Send + Sync {
    /// Start a timer that ticks every `period` until cancelled.
    fn start(&self, period: Duration) -> Box<dyn Timer>;
}

/// Periodic tick source owned by a running interval.
pub struct ClockService {
    timer: Option<Box<dyn Timer>>,
    period: Duration,
}

impl ClockService {
    /// Activate a clock on `scheduler` ticking every `period`.
    pub fn activate(scheduler: &dyn Scheduler, period: Duration) -> Self {
        let timer = scheduler.start(period);
        debug!(clock = %timer.id(), ?period, "Clock activated");
        Self {
            timer: Some(timer),
            period,
        }
    }

    /// Identifier of the live activation, `None` once deactivated.
    pub fn id(&self) -> Option<ClockId> {
        self.timer.as_ref().map(|t| t.id())
    }

    pub fn is_active(&self) -> bool {
        self.timer.is_some()
    }

    /// Whether a tick tagged `id` belongs to this live activation.
    pub fn accepts(&self, id: ClockId) -> bool {
        self.id() == Some(id)
    }

    /// Cancel the timer. Idempotent.
    pub fn deactivate(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            timer.cancel();
            debug!(clock = %timer.id(), "Clock deactivated");
        }
    }
}

impl Drop for ClockService {
    fn drop(&mut self) {
        self.deactivate();
    }
}

impl fmt::Debug for ClockService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClockService")
            .field("id", &self.id())
            .field("period", &self.period)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activation_registers_timer() {
        let scheduler = ManualScheduler::new();
        let clock = ClockService::activate(&scheduler, Duration::from_secs(1));

        assert!(clock.is_active());
        assert_eq!(scheduler.active_count(), 1);
        assert_eq!(scheduler.active_clocks(), vec![clock.id().unwrap()]);
    }

    #[test]
    fn deactivate_is_idempotent() {
        let scheduler = ManualScheduler::new();
        let mut clock = ClockService::activate(&scheduler, Duration::from_secs(1));

        clock.deactivate();
        clock.deactivate();

        assert!(!clock.is_active());
        assert_eq!(clock.id(), None);
        assert_eq!(scheduler.active_count(), 0);
    }

    #[test]
    fn drop_cancels_timer() {
        let scheduler = ManualScheduler::new();
        {
            let _clock = ClockService::activate(&scheduler, Duration::from_secs(1));
            assert_eq!(scheduler.active_count(), 1);
        }
        assert_eq!(scheduler.active_count(), 0);
    }

    #[test]
    fn stale_ids_are_rejected() {
        let scheduler = ManualScheduler::new();
        let first = ClockService::activate(&scheduler, Duration::from_secs(1));
        let stale = first.id().unwrap();
        drop(first);

        let second = ClockService::activate(&scheduler, Duration::from_secs(1));
        assert!(!second.accepts(stale));
        assert!(second.accepts(second.id().unwrap()));
    }

    #[test]
    fn clock_id_displays_with_prefix() {
        assert_eq!(ClockId(7).to_string(), "clock-7");
    }
}
