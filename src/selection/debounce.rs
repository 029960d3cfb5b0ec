use std::time::{Duration, Instant};

/// Default quiescence window for the search box.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(250);

/// Identifies one scheduled update. Only the most recent handle can fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceHandle(u64);

#[derive(Debug, Clone, PartialEq)]
struct Pending<T> {
    handle: DebounceHandle,
    value: T,
    deadline: Instant,
}

/// Holds at most one pending value and releases it once `window` has passed
/// without a newer `schedule`.
///
/// Time is passed in by the caller, so the owner decides when to poll.
#[derive(Debug, Clone, PartialEq)]
pub struct Debouncer<T> {
    window: Duration,
    next_id: u64,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            next_id: 0,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Replace any pending value and restart the window from `now`.
    pub fn schedule(&mut self, value: T, now: Instant) -> DebounceHandle {
        let handle = DebounceHandle(self.next_id);
        self.next_id += 1;
        self.pending = Some(Pending {
            handle,
            value,
            deadline: now + self.window,
        });
        handle
    }

    /// Drop the pending value if `handle` is still the current one.
    pub fn cancel(&mut self, handle: DebounceHandle) -> bool {
        if self.pending.as_ref().is_some_and(|p| p.handle == handle) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Release the pending value if its window has elapsed at `now`.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some(p) if now >= p.deadline => self.pending.take().map(|p| p.value),
            _ => None,
        }
    }

    /// Release the pending value immediately, window or not.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_rapid_calls_collapse_to_last() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(SEARCH_DEBOUNCE);
        let mut fired = Vec::new();

        for (i, text) in ["c", "ce", "cease"].iter().enumerate() {
            let now = t0 + ms(100 * i as u64);
            fired.extend(debouncer.poll(now));
            debouncer.schedule(text.to_string(), now);
        }
        // Last call at t0+200; window ends at t0+450.
        fired.extend(debouncer.poll(t0 + ms(300)));
        fired.extend(debouncer.poll(t0 + ms(449)));
        assert!(fired.is_empty());

        fired.extend(debouncer.poll(t0 + ms(450)));
        fired.extend(debouncer.poll(t0 + ms(900)));
        assert_eq!(fired, vec!["cease".to_string()]);
    }

    #[test]
    fn test_at_most_one_pending() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(ms(250));
        let first = debouncer.schedule(1, t0);
        let second = debouncer.schedule(2, t0 + ms(10));

        // The superseded handle can no longer cancel anything.
        assert!(!debouncer.cancel(first));
        assert_eq!(debouncer.deadline(), Some(t0 + ms(260)));
        assert!(debouncer.cancel(second));
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.poll(t0 + ms(1000)), None);
    }

    #[test]
    fn test_flush() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(ms(250));
        debouncer.schedule("now", t0);
        assert_eq!(debouncer.flush(), Some("now"));
        assert_eq!(debouncer.flush(), None);
    }
}
