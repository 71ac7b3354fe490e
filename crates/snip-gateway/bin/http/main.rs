mod cli;

use crate::cli::CLI;
use anyhow::Context as _;
use clap::Parser;
use snip_gateway::{App, AppState};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CLI::parse();
    snip_telemetry::init(cli.log_format.into())?;

    let config = cli.to_config()?;

    info!(
        listen_addr = %config.listen_addr,
        public_base_url = %config.public_base_url,
        capacity = config.capacity.get(),
        code_length = config.code_length,
        rate_limit = config.rate_limit.rate,
        rate_period = ?config.rate_limit.period,
        rate_limit_enabled = config.rate_limit_enabled,
        log_format = %cli.log_format,
        "starting gateway server"
    );

    let state = AppState::from_config(&config);
    let sweeper = state.rate_limiter().map(|registry| registry.spawn_sweeper());

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(listen_addr = %listener.local_addr()?, "gateway listening");

    axum::serve(
        listener,
        App::router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    if let Some(sweeper) = sweeper {
        sweeper.shutdown().await;
    }
    info!("gateway stopped");

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received, draining connections"),
        Err(e) => {
            // without a signal handler the server can only be killed
            warn!(error = %e, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
