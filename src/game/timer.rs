//! Cancellable scheduled tasks driven by caller-supplied instants.
//!
//! Nothing here reads the clock: the session is told what time it is, which
//! keeps the whole simulation reproducible under test.
use std::time::{Duration, Instant};

/// A one-shot task that is either idle or due at some instant
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Timer {
    deadline: Option<Instant>,
}

impl Timer {
    /// Arm the timer to fire at `when`, replacing any earlier schedule
    pub(crate) fn schedule(&mut self, when: Instant) {
        self.deadline = Some(when);
    }

    pub(crate) fn cancel(&mut self) {
        self.deadline = None;
    }

    pub(crate) fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Return the deadline if it is at or before `now`
    pub(crate) fn due(&self, now: Instant) -> Option<Instant> {
        self.deadline.filter(|&d| d <= now)
    }
}

/// Accumulates play time across pauses
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Stopwatch {
    banked: Duration,
    running_since: Option<Instant>,
}

impl Stopwatch {
    /// Create a stopped stopwatch already showing `banked`
    pub(crate) fn with_elapsed(banked: Duration) -> Stopwatch {
        Stopwatch {
            banked,
            running_since: None,
        }
    }

    pub(crate) fn start(&mut self, now: Instant) {
        if self.running_since.is_none() {
            self.running_since = Some(now);
        }
    }

    pub(crate) fn stop(&mut self, now: Instant) {
        if let Some(since) = self.running_since.take() {
            self.banked += now.saturating_duration_since(since);
        }
    }

    pub(crate) fn elapsed(&self, now: Instant) -> Duration {
        self.banked
            + self
                .running_since
                .map_or(Duration::ZERO, |since| now.saturating_duration_since(since))
    }
}
