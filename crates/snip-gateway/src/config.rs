use snip_generator::random::DEFAULT_LENGTH;
use snip_ratelimit::RateLimitSettings;
use std::net::{Ipv4Addr, SocketAddr};
use std::num::NonZeroUsize;
use std::time::Duration;
use thiserror::Error;
use typed_builder::TypedBuilder;

pub const DEFAULT_LISTEN_ADDR: SocketAddr = SocketAddr::new(
    std::net::IpAddr::V4(Ipv4Addr::UNSPECIFIED),
    3000,
);
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1_000_000) {
    Some(capacity) => capacity,
    None => unreachable!(),
};
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Generated codes must still be valid short codes.
const MAX_CODE_LENGTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("rate limit must allow at least one request per period")]
    ZeroRate,
    #[error("rate limit period must be longer than zero")]
    ZeroPeriod,
    #[error("sweep interval must be longer than zero")]
    ZeroSweepInterval,
    #[error("code length must be between 1 and {MAX_CODE_LENGTH}, got {0}")]
    CodeLength(usize),
    #[error("request timeout must be longer than zero")]
    ZeroRequestTimeout,
}

/// Everything the gateway needs to assemble and serve its router.
#[derive(Debug, Clone, TypedBuilder)]
pub struct GatewayConfig {
    #[builder(default = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,
    /// Prefix for the `short_link` field of responses.
    #[builder(default = DEFAULT_PUBLIC_BASE_URL.to_owned(), setter(into))]
    pub public_base_url: String,
    #[builder(default = DEFAULT_CAPACITY)]
    pub capacity: NonZeroUsize,
    #[builder(default = DEFAULT_LENGTH)]
    pub code_length: usize,
    #[builder(default)]
    pub rate_limit: RateLimitSettings,
    #[builder(default = true)]
    pub rate_limit_enabled: bool,
    #[builder(default = DEFAULT_REQUEST_TIMEOUT)]
    pub request_timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.code_length == 0 || self.code_length > MAX_CODE_LENGTH {
            return Err(ConfigError::CodeLength(self.code_length));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::ZeroRequestTimeout);
        }
        if self.rate_limit_enabled {
            if self.rate_limit.rate == 0 {
                return Err(ConfigError::ZeroRate);
            }
            if self.rate_limit.period.is_zero() {
                return Err(ConfigError::ZeroPeriod);
            }
            if self.rate_limit.sweep_interval.is_zero() {
                return Err(ConfigError::ZeroSweepInterval);
            }
        }
        Ok(())
    }
}
