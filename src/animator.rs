//! Fixed-period animation timer driven by the event loop.

use std::time::{Duration, Instant};
use tracing::debug;

/// Upper bound on ticks reported by a single poll
pub const MAX_CATCH_UP: u32 = 64;

/// Live registration of the repeating timer. Dropping it cancels the timer.
#[derive(Debug)]
pub struct TickHandle {
    next_deadline: Instant,
}

/// Stopped/Running state machine around an optional `TickHandle`
#[derive(Debug)]
pub struct Animator {
    period: Duration,
    handle: Option<TickHandle>,
}

impl Animator {
    /// A stopped animator ticking every `period` once started
    pub fn new(period: Duration) -> Self {
        Animator {
            period: period.max(Duration::from_millis(1)),
            handle: None,
        }
    }

    /// Time between two ticks
    pub fn period(&self) -> Duration {
        self.period
    }

    /// True while a timer is registered
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Schedules the timer. Returns false (and changes nothing) when a timer
    /// is already registered.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.handle.is_some() {
            return false;
        }
        self.handle = Some(TickHandle {
            next_deadline: now + self.period,
        });
        debug!(period_ms = self.period.as_millis() as u64, "animation started");
        true
    }

    /// Cancels the timer. Returns false when nothing was scheduled.
    pub fn stop(&mut self) -> bool {
        match self.handle.take() {
            Some(_) => {
                debug!("animation stopped");
                true
            }
            None => false,
        }
    }

    /// When the next tick is due, if running
    pub fn next_deadline(&self) -> Option<Instant> {
        self.handle.as_ref().map(|h| h.next_deadline)
    }

    /// Consumes the ticks that have come due by `now`. At most
    /// `MAX_CATCH_UP` are reported; older missed deadlines are dropped.
    pub fn due_ticks(&mut self, now: Instant) -> u32 {
        let period = self.period;
        let Some(handle) = self.handle.as_mut() else {
            return 0;
        };
        if now < handle.next_deadline {
            return 0;
        }
        let behind = now.duration_since(handle.next_deadline);
        let due = (behind.as_nanos() / period.as_nanos()) as u64 + 1;
        handle.next_deadline += period * u32::try_from(due).unwrap_or(u32::MAX);
        due.min(MAX_CATCH_UP as u64) as u32
    }
}
