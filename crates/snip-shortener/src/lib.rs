//! URL shortener service implementation.
//!
//! [`ShortenerService`] layers the find-or-create semantics of the public
//! API over any [`Repository`](snip_core::Repository) and
//! [`Generator`](snip_generator::Generator). Core types are re-exported from
//! `snip_core`.

pub mod service;

pub use service::ShortenerService;
pub use snip_core::{Shortened, Shortener, ShortenerError};
