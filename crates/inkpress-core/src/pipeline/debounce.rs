//! Single-slot debouncing for interactive parameter changes.
//!
//! A slider drag produces a burst of values. Each new value overwrites the
//! pending one; the slot only becomes ready once no new value has arrived
//! for the whole window. Superseded values are dropped, never queued.
//!
//! Time and the window length are passed in by the host (milliseconds from
//! any monotonic clock), so a changed window applies to values already
//! pending and the behavior is deterministic under test.

/// Holds at most one pending value and releases it after a quiet period.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    pending: Option<Pending<T>>,
}

#[derive(Debug, Clone)]
struct Pending<T> {
    value: T,
    last_input_ms: u64,
    /// Held values never become ready on their own.
    held: bool,
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Debouncer<T> {
    pub fn new() -> Self {
        Self { pending: None }
    }

    /// Store a new value and restart the window.
    ///
    /// Returns the value it superseded, if any.
    pub fn submit(&mut self, value: T, now_ms: u64) -> Option<T> {
        self.pending
            .replace(Pending {
                value,
                last_input_ms: now_ms,
                held: false,
            })
            .map(|p| p.value)
    }

    /// Park a value without a deadline.
    ///
    /// It stays visible through [`peek`](Self::peek) and is returned by
    /// [`flush`](Self::flush), but [`take_ready`](Self::take_ready) skips it
    /// until a later [`submit`](Self::submit) replaces it.
    pub fn hold(&mut self, value: T) {
        self.pending = Some(Pending {
            value,
            last_input_ms: 0,
            held: true,
        });
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The pending value, without taking it.
    pub fn peek(&self) -> Option<&T> {
        self.pending.as_ref().map(|p| &p.value)
    }

    /// When the pending value becomes ready under `window_ms`.
    pub fn deadline_ms(&self, window_ms: u64) -> Option<u64> {
        self.pending
            .as_ref()
            .filter(|p| !p.held)
            .map(|p| p.last_input_ms.saturating_add(window_ms))
    }

    /// Take the pending value if `window_ms` has elapsed since the last input.
    pub fn take_ready(&mut self, now_ms: u64, window_ms: u64) -> Option<T> {
        match self.deadline_ms(window_ms) {
            Some(deadline) if now_ms >= deadline => self.flush(),
            _ => None,
        }
    }

    /// Take the pending value immediately, ignoring the window.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_ready_inside_window() {
        let mut d = Debouncer::new();
        d.submit(1, 1_000);

        assert_eq!(d.take_ready(1_299, 300), None);
        assert!(d.is_pending());
        assert_eq!(d.take_ready(1_300, 300), Some(1));
        assert!(!d.is_pending());
    }

    #[test]
    fn test_burst_coalesces_to_last_value() {
        let mut d = Debouncer::new();
        assert_eq!(d.submit(10, 0), None);
        assert_eq!(d.submit(20, 100), Some(10));
        assert_eq!(d.submit(30, 250), Some(20));

        // Window restarts at the last input
        assert_eq!(d.take_ready(400, 300), None);
        assert_eq!(d.deadline_ms(300), Some(550));
        assert_eq!(d.take_ready(550, 300), Some(30));
        assert_eq!(d.take_ready(10_000, 300), None);
    }

    #[test]
    fn test_window_change_applies_to_pending_value() {
        let mut d = Debouncer::new();
        d.submit('x', 10);
        assert_eq!(d.deadline_ms(300), Some(310));
        assert_eq!(d.deadline_ms(50), Some(60));
        assert_eq!(d.take_ready(60, 50), Some('x'));
    }

    #[test]
    fn test_flush_ignores_window() {
        let mut d = Debouncer::new();
        d.submit("a", 0);
        assert_eq!(d.peek(), Some(&"a"));
        assert_eq!(d.flush(), Some("a"));
        assert_eq!(d.flush(), None);
    }

    #[test]
    fn test_held_value_waits_for_flush() {
        let mut d = Debouncer::new();
        d.hold(7);

        assert!(d.is_pending());
        assert_eq!(d.peek(), Some(&7));
        assert_eq!(d.deadline_ms(0), None);
        assert_eq!(d.take_ready(u64::MAX, 0), None);
        assert_eq!(d.flush(), Some(7));
    }

    #[test]
    fn test_submit_rearms_held_value() {
        let mut d = Debouncer::new();
        d.hold(1);
        assert_eq!(d.submit(2, 100), Some(1));
        assert_eq!(d.deadline_ms(300), Some(400));
        assert_eq!(d.take_ready(400, 300), Some(2));
    }

    #[test]
    fn test_clock_going_backwards_is_not_ready() {
        let mut d = Debouncer::new();
        d.submit((), 1_000);
        assert_eq!(d.take_ready(10, 50), None);
    }

    #[test]
    fn test_deadline_saturates() {
        let mut d = Debouncer::new();
        d.submit(0u8, u64::MAX - 1);
        assert_eq!(d.deadline_ms(300), Some(u64::MAX));
    }

    #[test]
    fn test_zero_window_is_ready_immediately() {
        let mut d = Debouncer::new();
        d.submit(5, 42);
        assert_eq!(d.take_ready(42, 0), Some(5));
    }
}
