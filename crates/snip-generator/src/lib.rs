//! Short code generators.
//!
//! [`RandomGenerator`] is what the service runs with; [`SeqGenerator`] gives
//! deterministic codes for tests and reproducible local runs.

pub mod random;
pub mod seq;

pub use random::RandomGenerator;
pub use seq::SeqGenerator;

use snip_core::{GeneratorError, ShortCode};

/// Trait for generating short codes.
///
/// Implementations are pure generators that don't interact with storage.
/// No uniqueness guarantee is required: the repository rejects collisions
/// and the caller decides whether to try again.
pub trait Generator: Send + Sync + 'static {
    /// Generates a candidate short code.
    fn generate(&self) -> Result<ShortCode, GeneratorError>;
}
