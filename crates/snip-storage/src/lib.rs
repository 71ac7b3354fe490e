//! Storage backends for the snip URL shortener.

pub mod memory;

pub use memory::InMemoryRepository;
pub use snip_core::{Repository, StorageError};
