//! Per-client token-bucket rate limiting.
//!
//! A [`RateLimiterRegistry`] lazily gives every client key its own
//! [`TokenBucket`] and forgets clients that stay idle for longer than the
//! configured threshold. Eviction runs either on demand through
//! [`RateLimiterRegistry::sweep`] or periodically on a [`Sweeper`] task.

pub mod bucket;
pub mod clock;
pub mod config;
pub mod registry;
pub mod sweeper;

pub use bucket::TokenBucket;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::RateLimitSettings;
pub use registry::RateLimiterRegistry;
pub use sweeper::Sweeper;
