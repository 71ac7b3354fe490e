use clap::{Parser, ValueEnum};
use snip_gateway::config::{ConfigError, GatewayConfig};
use snip_ratelimit::RateLimitSettings;
use snip_telemetry::LogFormat;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::time::Duration;

pub const LISTEN_ADDR_ENV: &str = "SNIP_GATEWAY_LISTEN_ADDR";
pub const PUBLIC_BASE_URL_ENV: &str = "SNIP_GATEWAY_PUBLIC_BASE_URL";
pub const CAPACITY_ENV: &str = "SNIP_GATEWAY_CAPACITY";
pub const CODE_LENGTH_ENV: &str = "SNIP_GATEWAY_CODE_LENGTH";
pub const RATE_LIMIT_ENV: &str = "SNIP_GATEWAY_RATE_LIMIT";
pub const RATE_PERIOD_MS_ENV: &str = "SNIP_GATEWAY_RATE_PERIOD_MS";
pub const REQUEST_TIMEOUT_MS_ENV: &str = "SNIP_GATEWAY_REQUEST_TIMEOUT_MS";
pub const SWEEP_INTERVAL_SECS_ENV: &str = "SNIP_GATEWAY_SWEEP_INTERVAL_SECS";
pub const INACTIVITY_SECS_ENV: &str = "SNIP_GATEWAY_INACTIVITY_SECS";
pub const DISABLE_RATE_LIMIT_ENV: &str = "SNIP_GATEWAY_DISABLE_RATE_LIMIT";
pub const LOG_FORMAT_ENV: &str = "SNIP_GATEWAY_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    #[value(name = "pretty")]
    Pretty,
    #[value(name = "json")]
    Json,
}

impl Display for LogFormatArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormatArg::Pretty => write!(f, "pretty"),
            LogFormatArg::Json => write!(f, "json"),
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "snip-gateway")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    #[arg(long, env = PUBLIC_BASE_URL_ENV, default_value = DEFAULT_PUBLIC_BASE_URL)]
    pub public_base_url: String,

    #[arg(long, env = CAPACITY_ENV, default_value_t = snip_gateway::config::DEFAULT_CAPACITY)]
    pub capacity: NonZeroUsize,

    #[arg(long, env = CODE_LENGTH_ENV, default_value_t = 8)]
    pub code_length: usize,

    /// Requests allowed per client per rate period.
    #[arg(long, env = RATE_LIMIT_ENV, default_value_t = 10)]
    pub rate_limit: u32,

    #[arg(long, env = RATE_PERIOD_MS_ENV, default_value_t = 1000)]
    pub rate_period_ms: u64,

    #[arg(long, env = REQUEST_TIMEOUT_MS_ENV, default_value_t = 5000)]
    pub request_timeout_ms: u64,

    #[arg(long, env = SWEEP_INTERVAL_SECS_ENV, default_value_t = 60)]
    pub sweep_interval_secs: u64,

    /// Clients idle for longer than this lose their rate limit state.
    #[arg(long, env = INACTIVITY_SECS_ENV, default_value_t = 180)]
    pub inactivity_secs: u64,

    #[arg(long, env = DISABLE_RATE_LIMIT_ENV)]
    pub disable_rate_limit: bool,

    #[arg(
        long,
        env = LOG_FORMAT_ENV,
        value_enum,
        default_value_t = LogFormatArg::Pretty
    )]
    pub log_format: LogFormatArg,
}

impl CLI {
    pub fn to_config(&self) -> Result<GatewayConfig, ConfigError> {
        let rate_limit = RateLimitSettings::builder()
            .rate(self.rate_limit)
            .period(Duration::from_millis(self.rate_period_ms))
            .sweep_interval(Duration::from_secs(self.sweep_interval_secs))
            .inactivity_threshold(Duration::from_secs(self.inactivity_secs))
            .build();

        let config = GatewayConfig::builder()
            .listen_addr(self.listen_addr)
            .public_base_url(self.public_base_url.clone())
            .capacity(self.capacity)
            .code_length(self.code_length)
            .rate_limit(rate_limit)
            .rate_limit_enabled(!self.disable_rate_limit)
            .request_timeout(Duration::from_millis(self.request_timeout_ms))
            .build();

        config.validate()?;
        Ok(config)
    }
}
