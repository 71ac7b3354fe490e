//! HTTP front end for the snip URL shortener.
//!
//! [`App::router`] wires the JSON API, the redirect route and the health
//! check onto an [`AppState`]; the `gateway` binary builds that state from
//! command line flags and serves it.

pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod model;
pub mod state;

pub use app::App;
pub use config::GatewayConfig;
pub use error::{AppError, Result};
pub use state::AppState;
