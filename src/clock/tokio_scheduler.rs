//! Tokio-backed scheduler.
//!
//! Each activation is a tokio task that sends its [`ClockId`] down an
//! unbounded channel once per period. Cancelling aborts the task; ticks it
//! already queued stay in the channel and are rejected by id downstream.

use super::{ClockId, Scheduler, Timer};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::trace;

/// Scheduler spawning one tokio task per clock activation.
///
/// Must be used from within a tokio runtime.
pub struct TokioScheduler {
    ticks: mpsc::UnboundedSender<ClockId>,
    next_id: AtomicU64,
}

impl TokioScheduler {
    /// Create a scheduler and the receiving end of its tick channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ClockId>) {
        let (ticks, rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            ticks,
            next_id: AtomicU64::new(1),
        };
        (scheduler, rx)
    }
}

impl Scheduler for TokioScheduler {
    fn start(&self, period: Duration) -> Box<dyn Timer> {
        let id = ClockId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let ticks = self.ticks.clone();

        let handle = tokio::spawn(async move {
            // First tick one full period after activation, not immediately.
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                trace!(clock = %id, "Tick");
                if ticks.send(id).is_err() {
                    break;
                }
            }
        });

        Box::new(TokioTimer {
            id,
            handle: Some(handle),
        })
    }
}

struct TokioTimer {
    id: ClockId,
    handle: Option<JoinHandle<()>>,
}

impl Timer for TokioTimer {
    fn id(&self) -> ClockId {
        self.id
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for TokioTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
