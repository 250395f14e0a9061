use std::time::{Duration, Instant};

/// Trailing debouncer with a single pending deadline.
///
/// Each notification replaces the pending deadline (latest-wins); the
/// action becomes due only once the quiescence window has elapsed since
/// the most recent notification. Driven entirely by caller-supplied
/// `Instant`s, so behavior is deterministic and testable without sleeping.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// (Re)arm the deadline at `now + window`, replacing any pending one.
    pub fn notify(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    /// The pending deadline, if any. Lets an event loop sleep exactly
    /// until the debounce is due instead of polling.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns true exactly once per armed deadline, when `now` has
    /// reached it; the deadline is consumed.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Drop any pending deadline without firing.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}
