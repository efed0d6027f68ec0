//! Cancellable fixed-interval pollers.
//!
//! The looper runs two of these while playing: one refreshes the progress
//! display, one checks whether the playhead crossed the loop end. Both are
//! driven by the caller's clock so they can be tested without sleeping.

use std::time::{Duration, Instant};

/// A recurring callback schedule that can be started and cancelled.
#[derive(Debug, Clone)]
pub struct Poller {
    interval: Duration,
    next_due: Option<Instant>,
}

impl Poller {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start polling; the first run is due immediately.
    ///
    /// Starting an active poller keeps its schedule.
    pub fn start(&mut self, now: Instant) {
        if self.next_due.is_none() {
            self.next_due = Some(now);
        }
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    /// Whether a run is due at `now`; if so the next run is scheduled.
    pub fn due(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(at) if now >= at => {
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }

    /// Time left until the next run, `None` when cancelled.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|at| at.saturating_duration_since(now))
    }
}
