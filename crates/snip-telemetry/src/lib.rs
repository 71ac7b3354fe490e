//! Process-wide tracing setup shared by the snip binaries.
//!
//! [`init`] installs a `tracing-subscriber` registry with an [`EnvFilter`]
//! taken from `RUST_LOG` (falling back to [`DEFAULT_DIRECTIVE`]) and a fmt
//! layer in the requested [`LogFormat`].

use std::fmt::{Display, Formatter};
use thiserror::Error;
use tracing_subscriber::filter::{EnvFilter, ParseError};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::fmt;

pub const DEFAULT_DIRECTIVE: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human readable, multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl Display for LogFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Pretty => write!(f, "pretty"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),
    #[error("failed to install tracing subscriber: {0}")]
    Install(#[from] TryInitError),
}

/// Builds the filter from `RUST_LOG`, or from [`DEFAULT_DIRECTIVE`] when the
/// variable is unset or empty.
pub fn env_filter() -> Result<EnvFilter, TelemetryError> {
    match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) if !directives.trim().is_empty() => Ok(EnvFilter::try_new(directives)?),
        _ => Ok(EnvFilter::try_new(DEFAULT_DIRECTIVE)?),
    }
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init(format: LogFormat) -> Result<(), TelemetryError> {
    let filter = env_filter()?;
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init()?,
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(true))
            .try_init()?,
    }

    tracing::debug!(%format, "tracing initialised");
    Ok(())
}
