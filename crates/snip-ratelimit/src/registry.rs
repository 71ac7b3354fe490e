use crate::bucket::TokenBucket;
use crate::clock::{Clock, SystemClock};
use crate::config::RateLimitSettings;
use crate::sweeper::Sweeper;
use dashmap::DashMap;
use jiff::{SignedDuration, Timestamp};
use std::sync::Arc;
use tracing::{debug, trace};

#[derive(Debug)]
struct ClientEntry {
    bucket: TokenBucket,
    last_seen: Timestamp,
}

/// Tracks one token bucket per client key.
///
/// Entries are created on a client's first request and live until a sweep
/// finds them idle for longer than `inactivity_threshold`. An evicted client
/// that returns starts over with a full bucket.
#[derive(Debug)]
pub struct RateLimiterRegistry<C: Clock = SystemClock> {
    entries: DashMap<String, ClientEntry>,
    settings: RateLimitSettings,
    clock: C,
}

impl RateLimiterRegistry<SystemClock> {
    pub fn new(settings: RateLimitSettings) -> Self {
        Self::with_clock(settings, SystemClock)
    }
}

impl<C: Clock> RateLimiterRegistry<C> {
    pub fn with_clock(settings: RateLimitSettings, clock: C) -> Self {
        Self {
            entries: DashMap::new(),
            settings,
            clock,
        }
    }

    pub fn settings(&self) -> &RateLimitSettings {
        &self.settings
    }

    /// Number of clients currently holding a bucket.
    pub fn tracked_clients(&self) -> usize {
        self.entries.len()
    }

    /// Records a request from `client` and reports whether it fits the quota.
    ///
    /// Never blocks waiting for tokens: a client with an empty bucket is
    /// denied immediately.
    pub fn allow(&self, client: &str) -> bool {
        let now = self.clock.now();

        let allowed = match self.entries.get_mut(client) {
            Some(mut entry) => {
                entry.last_seen = now;
                entry.bucket.try_acquire(now)
            }
            None => {
                let mut entry = self
                    .entries
                    .entry(client.to_owned())
                    .or_insert_with(|| {
                        debug!(client, rate = self.settings.rate, "tracking new client");
                        ClientEntry {
                            bucket: TokenBucket::new(self.settings.rate, self.settings.period, now),
                            last_seen: now,
                        }
                    });
                entry.last_seen = now;
                entry.bucket.try_acquire(now)
            }
        };

        if !allowed {
            debug!(client, "rate limit exceeded");
        }
        allowed
    }

    /// Evicts clients idle for longer than the inactivity threshold and
    /// returns how many were removed.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let threshold = SignedDuration::try_from(self.settings.inactivity_threshold)
            .unwrap_or(SignedDuration::MAX);

        let mut evicted = 0;
        self.entries.retain(|client, entry| {
            let keep = now.duration_since(entry.last_seen) <= threshold;
            if !keep {
                trace!(client = %client, last_seen = %entry.last_seen, "evicting idle client");
                evicted += 1;
            }
            keep
        });

        evicted
    }

    /// Starts a background task that sweeps every `sweep_interval`.
    ///
    /// Must be called from inside a tokio runtime.
    pub fn spawn_sweeper(self: &Arc<Self>) -> Sweeper {
        Sweeper::spawn(Arc::clone(self), self.settings.sweep_interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::time::Duration;

    fn registry(rate: u32, period: Duration) -> (RateLimiterRegistry<ManualClock>, ManualClock) {
        let clock = ManualClock::default();
        let settings = RateLimitSettings::builder()
            .rate(rate)
            .period(period)
            .inactivity_threshold(Duration::from_secs(180))
            .build();
        (RateLimiterRegistry::with_clock(settings, clock.clone()), clock)
    }

    #[test]
    fn allows_exactly_rate_requests_per_period() {
        let (registry, clock) = registry(10, Duration::from_secs(1));

        for i in 0..10 {
            assert!(registry.allow("10.0.0.1"), "request {i} should pass");
        }
        assert!(!registry.allow("10.0.0.1"));

        clock.advance(Duration::from_secs(1));
        assert!(registry.allow("10.0.0.1"));
    }

    #[test]
    fn uneven_periods_refill_fully_after_exactly_one_period() {
        for (rate, period) in [(1, Duration::from_secs(49)), (3, Duration::from_millis(700))] {
            let (registry, clock) = registry(rate, period);
            for _ in 0..rate {
                assert!(registry.allow("client"));
            }
            assert!(!registry.allow("client"));

            clock.advance(period);

            for i in 0..rate {
                assert!(registry.allow("client"), "request {i} at {rate} per {period:?}");
            }
            assert!(!registry.allow("client"));
        }
    }

    #[test]
    fn partial_period_refills_partially() {
        let (registry, clock) = registry(4, Duration::from_secs(1));
        for _ in 0..4 {
            assert!(registry.allow("client"));
        }

        clock.advance(Duration::from_millis(500));

        assert!(registry.allow("client"));
        assert!(registry.allow("client"));
        assert!(!registry.allow("client"));
    }

    #[test]
    fn clients_are_isolated() {
        let (registry, _clock) = registry(1, Duration::from_secs(1));

        assert!(registry.allow("a"));
        assert!(!registry.allow("a"));
        assert!(registry.allow("b"));
        assert_eq!(registry.tracked_clients(), 2);
    }

    #[test]
    fn denied_requests_still_refresh_last_seen() {
        let (registry, clock) = registry(1, Duration::from_secs(3600));
        assert!(registry.allow("a"));

        clock.advance(Duration::from_secs(170));
        assert!(!registry.allow("a"));
        clock.advance(Duration::from_secs(170));

        assert_eq!(registry.sweep(), 0);
        assert_eq!(registry.tracked_clients(), 1);
    }

    #[test]
    fn sweep_evicts_only_idle_clients() {
        let (registry, clock) = registry(10, Duration::from_secs(1));
        registry.allow("idle");

        clock.advance(Duration::from_secs(120));
        registry.allow("active");
        clock.advance(Duration::from_secs(61));

        assert_eq!(registry.sweep(), 1);
        assert_eq!(registry.tracked_clients(), 1);
    }

    #[test]
    fn idle_exactly_at_threshold_is_kept() {
        let (registry, clock) = registry(10, Duration::from_secs(1));
        registry.allow("a");

        clock.advance(Duration::from_secs(180));

        assert_eq!(registry.sweep(), 0);
    }

    #[test]
    fn evicted_client_starts_with_a_full_bucket() {
        let (registry, clock) = registry(2, Duration::from_secs(3600));
        assert!(registry.allow("a"));
        assert!(registry.allow("a"));
        assert!(!registry.allow("a"));

        clock.advance(Duration::from_secs(181));
        assert_eq!(registry.sweep(), 1);

        assert!(registry.allow("a"));
        assert!(registry.allow("a"));
        assert!(!registry.allow("a"));
    }
}
