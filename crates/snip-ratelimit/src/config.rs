use std::time::Duration;
use typed_builder::TypedBuilder;

pub const DEFAULT_RATE: u32 = 10;
pub const DEFAULT_PERIOD: Duration = Duration::from_secs(1);
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);
pub const DEFAULT_INACTIVITY_THRESHOLD: Duration = Duration::from_secs(180);

/// Quota and eviction settings shared by every client of a registry.
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct RateLimitSettings {
    /// Requests allowed per `period`, which is also the burst size.
    #[builder(default = DEFAULT_RATE)]
    pub rate: u32,
    #[builder(default = DEFAULT_PERIOD)]
    pub period: Duration,
    /// How often the background sweeper runs.
    #[builder(default = DEFAULT_SWEEP_INTERVAL)]
    pub sweep_interval: Duration,
    /// Clients unseen for longer than this are evicted by a sweep.
    #[builder(default = DEFAULT_INACTIVITY_THRESHOLD)]
    pub inactivity_threshold: Duration,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = RateLimitSettings::default();
        assert_eq!(settings.rate, 10);
        assert_eq!(settings.period, Duration::from_secs(1));
        assert_eq!(settings.sweep_interval, Duration::from_secs(60));
        assert_eq!(settings.inactivity_threshold, Duration::from_secs(180));
    }

    #[test]
    fn builder_overrides() {
        let settings = RateLimitSettings::builder()
            .rate(3)
            .period(Duration::from_millis(250))
            .build();
        assert_eq!(settings.rate, 3);
        assert_eq!(settings.period, Duration::from_millis(250));
        assert_eq!(settings.sweep_interval, DEFAULT_SWEEP_INTERVAL);
    }
}
