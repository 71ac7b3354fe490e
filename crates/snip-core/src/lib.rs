//! Core types and traits for the snip URL shortener.
//!
//! This crate provides the shared vocabulary used by the storage, shortener
//! and gateway crates: short codes, stored records, the per-call
//! [`Context`], and the [`Repository`] / [`Shortener`] contracts.

pub mod context;
pub mod error;
pub mod repository;
pub mod shortcode;
pub mod shortener;

pub use context::Context;
pub use error::{CoreError, GeneratorError, Interrupted, ShortenerError, StorageError};
pub use repository::{Repository, UrlRecord};
pub use shortcode::ShortCode;
pub use shortener::{Shortened, Shortener};
