use crate::context::Context;
use crate::repository::UrlRecord;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, crate::error::ShortenerError>;

/// Outcome of a create request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shortened {
    /// A new record was stored.
    Created(UrlRecord),
    /// The URL was already shortened; this is the existing record.
    Existing(UrlRecord),
}

impl Shortened {
    pub fn is_created(&self) -> bool {
        matches!(self, Shortened::Created(_))
    }

    pub fn record(&self) -> &UrlRecord {
        match self {
            Shortened::Created(record) | Shortened::Existing(record) => record,
        }
    }

    pub fn into_record(self) -> UrlRecord {
        match self {
            Shortened::Created(record) | Shortened::Existing(record) => record,
        }
    }
}

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Shortens `original_url`, or returns the existing mapping if the URL
    /// has been shortened before.
    async fn create_short_url(&self, ctx: &Context, original_url: &str) -> Result<Shortened>;

    /// Resolves a short code to its stored record.
    async fn get_url_data(&self, ctx: &Context, code: &ShortCode) -> Result<UrlRecord>;

    /// Points an existing short code at `new_url` and returns the updated record.
    async fn update_url(&self, ctx: &Context, code: &ShortCode, new_url: &str)
        -> Result<UrlRecord>;

    /// Deletes a shortened URL by its short code.
    async fn delete_url(&self, ctx: &Context, code: &ShortCode) -> Result<()>;
}
