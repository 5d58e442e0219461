//! Debounced refresh scheduling.
//!
//! Layout notifications arrive in bursts (drag-and-drop, multi-pane
//! restores). [`RefreshScheduler`] coalesces them into one reconciliation:
//! every [`schedule`](RefreshScheduler::schedule) replaces the single
//! pending deadline with `now + delay`, and [`poll`](RefreshScheduler::poll)
//! fires once the latest deadline has passed.
//!
//! Time is supplied by the caller, so the scheduler is deterministic and
//! needs no timer thread. The host arms its own timer from
//! [`deadline`](RefreshScheduler::deadline).
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use web_time::Instant;
//! use tabnum_core::scheduler::RefreshScheduler;
//!
//! let mut scheduler = RefreshScheduler::new(Duration::from_millis(50));
//! let start = Instant::now();
//!
//! scheduler.schedule(start);
//! scheduler.schedule(start + Duration::from_millis(30)); // reschedules
//!
//! assert!(!scheduler.poll(start + Duration::from_millis(60)));
//! assert!(scheduler.poll(start + Duration::from_millis(80)));
//! assert!(!scheduler.is_pending());
//! ```

use web_time::{Duration, Instant};

/// Default delay between the last refresh request and the reconciliation.
pub const DEFAULT_REFRESH_DELAY_MS: u64 = 50;

/// Cancel-and-reschedule holder of at most one pending refresh.
#[derive(Debug, Clone)]
pub struct RefreshScheduler {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Default for RefreshScheduler {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_REFRESH_DELAY_MS))
    }
}

impl RefreshScheduler {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Pending deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Schedule a refresh at `now + delay`, replacing any pending one.
    ///
    /// Returns `true` when a pending refresh was replaced. A deadline past
    /// the clock's range is due at `now`.
    pub fn schedule(&mut self, now: Instant) -> bool {
        let deadline = now.checked_add(self.delay).unwrap_or(now);
        let replaced = self.deadline.replace(deadline).is_some();
        tracing::trace!(replaced, delay_ms = self.delay.as_millis() as u64, "refresh scheduled");
        replaced
    }

    /// Drop the pending refresh. Returns `true` if one was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    /// Consume the pending refresh if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn new_scheduler_is_idle() {
        let mut scheduler = RefreshScheduler::default();
        assert!(!scheduler.is_pending());
        assert_eq!(scheduler.delay(), ms(DEFAULT_REFRESH_DELAY_MS));
        assert!(!scheduler.poll(Instant::now() + ms(1_000)));
    }

    #[test]
    fn fires_once_after_delay() {
        let mut scheduler = RefreshScheduler::new(ms(50));
        let start = Instant::now();
        assert!(!scheduler.schedule(start));

        assert!(!scheduler.poll(start + ms(49)));
        assert!(scheduler.poll(start + ms(50)));
        assert!(!scheduler.poll(start + ms(51)));
    }

    #[test]
    fn reschedule_pushes_deadline_back() {
        let mut scheduler = RefreshScheduler::new(ms(50));
        let start = Instant::now();
        scheduler.schedule(start);
        assert!(scheduler.schedule(start + ms(40)));
        assert!(scheduler.schedule(start + ms(80)));

        assert_eq!(scheduler.deadline(), Some(start + ms(130)));
        assert!(!scheduler.poll(start + ms(100)));
        assert!(scheduler.poll(start + ms(130)));
    }

    #[test]
    fn cancel_drops_pending() {
        let mut scheduler = RefreshScheduler::new(ms(50));
        let start = Instant::now();
        scheduler.schedule(start);

        assert!(scheduler.cancel());
        assert!(!scheduler.cancel());
        assert!(!scheduler.poll(start + ms(500)));
    }

    #[test]
    fn unrepresentable_deadline_does_not_overflow() {
        let mut scheduler = RefreshScheduler::new(Duration::MAX);
        let start = Instant::now();
        assert!(!scheduler.schedule(start));
        assert!(scheduler.poll(start));
    }

    #[test]
    fn zero_delay_fires_immediately() {
        let mut scheduler = RefreshScheduler::new(Duration::ZERO);
        let start = Instant::now();
        scheduler.schedule(start);
        assert!(scheduler.poll(start));
    }
}
