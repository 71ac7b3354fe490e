use crate::error::{AppError, Result};
use crate::state::AppState;
use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use std::net::SocketAddr;
use tracing::warn;

/// Key used for requests whose peer address is unknown, e.g. when the router
/// is driven without `into_make_service_with_connect_info`.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Rejects requests from peers that exhausted their quota with `429`.
pub async fn rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response> {
    let Some(limiter) = state.rate_limiter() else {
        return Ok(next.run(request).await);
    };

    let client = client_key(&request);
    if !limiter.allow(&client) {
        warn!(client = %client, path = %request.uri().path(), "rate limit exceeded");
        return Err(AppError::RateLimited);
    }

    Ok(next.run(request).await)
}

fn client_key(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_owned())
}
