use std::time::{Duration, Instant};

/// Last-writer-wins scheduler.
///
/// Each request replaces the pending one and restarts the idle window; the
/// value is released only once the window passes without a newer request.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Debouncer {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `value`, superseding anything still pending
    pub fn request(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    /// Take the pending value if its window has passed
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let is_due = self.pending.as_ref().is_some_and(|(_, due)| *due <= now);
        if is_due {
            self.pending.take().map(|(value, _)| value)
        } else {
            None
        }
    }

    /// Time left until the pending value is due (zero if overdue)
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|(_, due)| due.saturating_duration_since(now))
    }

    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref().map(|(value, _)| value)
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }
}
