use crate::context::Context;
use crate::error::StorageError;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A stored URL record in the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRecord {
    /// The short code that identifies this record.
    pub short_code: ShortCode,
    /// The original URL that was shortened.
    pub original_url: String,
    /// When the record was first stored. Never changes afterwards.
    pub created_at: Timestamp,
    /// When the record was last modified.
    pub updated_at: Timestamp,
}

impl UrlRecord {
    /// Builds a fresh record stamped with the current time.
    ///
    /// Repositories restamp both timestamps on insert, so the values set here
    /// only matter to callers that never store the record.
    pub fn new(short_code: ShortCode, original_url: impl Into<String>) -> Self {
        let now = Timestamp::now();
        Self {
            short_code,
            original_url: original_url.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Concurrency-safe CRUD over [`UrlRecord`]s.
///
/// Every operation checks the [`Context`] before touching state and fails
/// with [`StorageError::Interrupted`] when it is cancelled or expired.
#[async_trait]
pub trait Repository: Send + Sync + 'static {
    /// Inserts a new record and returns it as stored.
    ///
    /// Fails with `CapacityReached` when the repository is full,
    /// `KeyExists` when the short code is taken, and `UrlExists` when the
    /// original URL is already stored under another code.
    async fn create(&self, ctx: &Context, record: UrlRecord) -> Result<UrlRecord>;

    /// Returns an owned copy of the record for `code`.
    async fn read(&self, ctx: &Context, code: &ShortCode) -> Result<UrlRecord>;

    /// Returns the short code currently mapped to `original_url`.
    async fn find_key_by_url(&self, ctx: &Context, original_url: &str) -> Result<ShortCode>;

    /// Replaces the original URL of an existing record.
    ///
    /// `created_at` is preserved and `updated_at` refreshed regardless of the
    /// timestamps carried by `record`.
    async fn update(&self, ctx: &Context, record: UrlRecord) -> Result<UrlRecord>;

    /// Removes the record for `code`, freeing its capacity slot.
    async fn delete(&self, ctx: &Context, code: &ShortCode) -> Result<()>;
}
