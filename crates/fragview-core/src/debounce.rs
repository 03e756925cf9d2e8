use std::time::{Duration, Instant};

/// Coalesces bursts of trigger events into a single firing: each trigger
/// within the quiet window cancels the pending deadline and restarts it, and
/// the action fires once the window elapses with no further triggers.
///
/// One debouncer handles one triggerable action; there are no hidden
/// callbacks. The owner drives it with explicit timestamps, which keeps the
/// policy deterministic and testable.
#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    window: Duration,
    pending_since: Option<Instant>,
}

impl Debouncer {
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            pending_since: None,
        }
    }

    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Record a trigger at `now`, cancelling any pending deadline and
    /// rescheduling it a full window later.
    pub fn trigger(&mut self, now: Instant) {
        self.pending_since = Some(now);
    }

    /// Drop the pending deadline without firing. Returns whether one existed.
    pub fn cancel(&mut self) -> bool {
        self.pending_since.take().is_some()
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending_since.is_some()
    }

    /// The instant the pending action becomes due, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending_since.map(|since| since + self.window)
    }

    /// Consume the pending deadline if the quiet window has elapsed by `now`.
    /// Returns `true` exactly once per elapsed window.
    pub fn fire_due(&mut self, now: Instant) -> bool {
        match self.deadline() {
            Some(deadline) if deadline <= now => {
                self.pending_since = None;
                true
            }
            _ => false,
        }
    }
}
