//! Hand-driven scheduler for tests and synchronous stepping.

use super::{ClockId, Scheduler, Timer};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::trace;

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    active: BTreeMap<ClockId, Duration>,
    started: usize,
    cancelled: usize,
    peak_active: usize,
}

/// Scheduler whose timers never fire on their own.
///
/// The caller asks which clocks are live and delivers their ticks itself,
/// which keeps tests free of wall-clock waits. Clones share one registry.
///
/// # Example
///
/// ```rust
/// use metronome::clock::{ClockService, ManualScheduler};
/// use std::time::Duration;
///
/// let scheduler = ManualScheduler::new();
/// let clock = ClockService::activate(&scheduler, Duration::from_secs(1));
///
/// assert_eq!(scheduler.current(), clock.id());
/// drop(clock);
/// assert_eq!(scheduler.current(), None);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    registry: Arc<Mutex<Registry>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Ids of all clocks currently running, oldest first.
    pub fn active_clocks(&self) -> Vec<ClockId> {
        self.registry().active.keys().copied().collect()
    }

    /// The single live clock, if exactly one is running.
    pub fn current(&self) -> Option<ClockId> {
        let registry = self.registry();
        if registry.active.len() == 1 {
            registry.active.keys().next().copied()
        } else {
            None
        }
    }

    pub fn active_count(&self) -> usize {
        self.registry().active.len()
    }

    /// Total activations since creation.
    pub fn started_count(&self) -> usize {
        self.registry().started
    }

    /// Total cancellations since creation.
    pub fn cancelled_count(&self) -> usize {
        self.registry().cancelled
    }

    /// Largest number of clocks that were ever live at the same time.
    pub fn peak_active(&self) -> usize {
        self.registry().peak_active
    }
}

impl Scheduler for ManualScheduler {
    fn start(&self, period: Duration) -> Box<dyn Timer> {
        let mut registry = self.registry();
        registry.next_id += 1;
        let id = ClockId(registry.next_id);
        registry.active.insert(id, period);
        registry.started += 1;
        registry.peak_active = registry.peak_active.max(registry.active.len());
        trace!(clock = %id, ?period, "Manual timer started");

        Box::new(ManualTimer {
            id,
            registry: Arc::clone(&self.registry),
        })
    }
}

struct ManualTimer {
    id: ClockId,
    registry: Arc<Mutex<Registry>>,
}

impl Timer for ManualTimer {
    fn id(&self) -> ClockId {
        self.id
    }

    fn cancel(&mut self) {
        let mut registry = self
            .registry
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if registry.active.remove(&self.id).is_some() {
            registry.cancelled += 1;
            trace!(clock = %self.id, "Manual timer cancelled");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_per_activation() {
        let scheduler = ManualScheduler::new();
        let a = scheduler.start(Duration::from_secs(1));
        let b = scheduler.start(Duration::from_secs(1));

        assert_ne!(a.id(), b.id());
        assert_eq!(scheduler.active_count(), 2);
        assert_eq!(scheduler.peak_active(), 2);
        assert_eq!(scheduler.current(), None);
    }

    #[test]
    fn cancel_twice_counts_once() {
        let scheduler = ManualScheduler::new();
        let mut timer = scheduler.start(Duration::from_secs(1));

        timer.cancel();
        timer.cancel();

        assert_eq!(scheduler.cancelled_count(), 1);
        assert_eq!(scheduler.started_count(), 1);
        assert_eq!(scheduler.active_count(), 0);
    }

    #[test]
    fn clones_share_registry() {
        let scheduler = ManualScheduler::new();
        let view = scheduler.clone();
        let timer = scheduler.start(Duration::from_millis(500));

        assert_eq!(view.current(), Some(timer.id()));
    }
}
