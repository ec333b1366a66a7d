//! Dirty-line tracking and debounce.
//!
//! Edits lower a single "lowest dirty line" marker and restart a deadline. Nothing here owns
//! a timer: the host passes `now` in and polls, which keeps the scheduler a plain value that
//! tests can drive with synthetic instants.

use std::time::{Duration, Instant};

/// What the caller should do after [`UpdateScheduler::note_edit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// The delay is zero: recompute now.
    Immediate,
    /// Poll again at or after this instant.
    Deferred(Instant),
}

/// Coalesces edits into one recomputation from the lowest dirty line.
#[derive(Debug, Clone)]
pub struct UpdateScheduler {
    delay: Duration,
    dirty_line: Option<usize>,
    deadline: Option<Instant>,
}

impl UpdateScheduler {
    /// Create a scheduler with the given debounce delay.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            dirty_line: None,
            deadline: None,
        }
    }

    /// Record an edit starting at `line`.
    ///
    /// The marker only ever moves down. The deadline restarts from `now`.
    pub fn note_edit(&mut self, line: usize, now: Instant) -> Schedule {
        let dirty = self.dirty_line.map_or(line, |current| current.min(line));
        self.dirty_line = Some(dirty);

        if self.delay.is_zero() {
            self.deadline = Some(now);
            tracing::trace!(target: "brackets.scheduler", line, dirty, "edit_immediate");
            return Schedule::Immediate;
        }

        let deadline = now + self.delay;
        self.deadline = Some(deadline);
        tracing::trace!(
            target: "brackets.scheduler",
            line,
            dirty,
            delay = ?self.delay,
            "edit_deferred"
        );
        Schedule::Deferred(deadline)
    }

    /// Fire if the deadline has been reached: returns the lowest dirty line and resets.
    pub fn poll(&mut self, now: Instant) -> Option<usize> {
        match self.deadline {
            Some(deadline) if now >= deadline => self.take(),
            _ => None,
        }
    }

    /// Fire regardless of the deadline.
    pub fn take(&mut self) -> Option<usize> {
        self.deadline = None;
        let line = self.dirty_line.take();
        if let Some(line) = line {
            tracing::trace!(target: "brackets.scheduler", line, "fired");
        }
        line
    }

    /// Drop any pending work.
    pub fn reset(&mut self) {
        self.dirty_line = None;
        self.deadline = None;
    }

    /// Lowest dirty line, if any work is pending.
    pub fn dirty_line(&self) -> Option<usize> {
        self.dirty_line
    }

    /// When the pending work becomes due.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns `true` if an edit is waiting to be processed.
    pub fn is_pending(&self) -> bool {
        self.dirty_line.is_some()
    }

    /// Debounce delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Change the debounce delay. A pending deadline is kept as is.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }
}
