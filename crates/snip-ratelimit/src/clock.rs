use jiff::{SignedDuration, Timestamp};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

pub trait Clock: Send + Sync + 'static {
    /// Returns the current time of the clock
    fn now(&self) -> Timestamp;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same time, so a test can keep one handle and give the
/// other to a registry.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Timestamp>>,
}

impl ManualClock {
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    /// Moves the clock forward by `by`. Saturates at the largest timestamp.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        let by = SignedDuration::try_from(by).unwrap_or(SignedDuration::MAX);
        *now = now.checked_add(by).unwrap_or(Timestamp::MAX);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Timestamp::UNIX_EPOCH)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_starts_where_told() {
        let base = Timestamp::from_second(1_000).unwrap();
        let clock = ManualClock::new(base);
        assert_eq!(clock.now(), base);
    }

    #[test]
    fn manual_clock_advance_is_shared_between_clones() {
        let clock = ManualClock::default();
        let handle = clock.clone();

        handle.advance(Duration::from_millis(1500));

        assert_eq!(
            clock.now(),
            Timestamp::UNIX_EPOCH + SignedDuration::from_millis(1500)
        );
    }

    #[test]
    fn system_clock_moves_forward() {
        let first = SystemClock.now();
        let second = SystemClock.now();
        assert!(second >= first);
    }
}
