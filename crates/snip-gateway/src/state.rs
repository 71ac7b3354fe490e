use crate::config::GatewayConfig;
use crate::config::DEFAULT_REQUEST_TIMEOUT;
use snip_core::{Context, Shortener};
use snip_generator::RandomGenerator;
use snip_ratelimit::RateLimiterRegistry;
use snip_shortener::ShortenerService;
use snip_storage::InMemoryRepository;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    shortener: Arc<dyn Shortener>,
    rate_limiter: Option<Arc<RateLimiterRegistry>>,
    base_url: Arc<str>,
    request_timeout: Duration,
}

impl AppState {
    pub fn new(shortener: Arc<dyn Shortener>, public_base_url: impl Into<String>) -> Self {
        Self {
            shortener,
            rate_limiter: None,
            base_url: Arc::from(public_base_url.into()),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Assembles the in-memory store, the random generator and, unless
    /// disabled, the per-client rate limiter.
    pub fn from_config(config: &GatewayConfig) -> Self {
        let service = ShortenerService::new(
            InMemoryRepository::with_capacity(config.capacity),
            RandomGenerator::with_length(config.code_length),
        );

        let state = Self::new(Arc::new(service), config.public_base_url.clone())
            .with_request_timeout(config.request_timeout);

        if config.rate_limit_enabled {
            state.with_rate_limiter(Arc::new(RateLimiterRegistry::new(config.rate_limit.clone())))
        } else {
            state
        }
    }

    pub fn with_rate_limiter(mut self, registry: Arc<RateLimiterRegistry>) -> Self {
        self.rate_limiter = Some(registry);
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn shortener(&self) -> &dyn Shortener {
        self.shortener.as_ref()
    }

    pub fn rate_limiter(&self) -> Option<&Arc<RateLimiterRegistry>> {
        self.rate_limiter.as_ref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// A fresh context bounded by the configured request timeout.
    pub fn request_context(&self) -> Context {
        Context::with_timeout(self.request_timeout)
    }
}
