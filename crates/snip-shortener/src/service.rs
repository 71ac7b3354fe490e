use async_trait::async_trait;
use snip_core::{
    Context, Repository, ShortCode, Shortened, Shortener, ShortenerError, StorageError,
    UrlRecord,
};
use snip_generator::Generator;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// How many freshly generated codes to try before giving up on a collision.
const MAX_GENERATE_ATTEMPTS: usize = 3;

/// A concrete implementation of the `Shortener` trait.
///
/// This service wraps a `Repository` and a `Generator` and holds no state of
/// its own:
/// - an already-shortened URL returns its existing record
/// - new URLs get a generated code; a code collision is retried with a new code
/// - storage errors are translated 1:1 into [`ShortenerError`]
#[derive(Debug)]
pub struct ShortenerService<R, G> {
    repository: Arc<R>,
    generator: Arc<G>,
}

impl<R, G> Clone for ShortenerService<R, G> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            generator: Arc::clone(&self.generator),
        }
    }
}

impl<R: Repository, G: Generator> ShortenerService<R, G> {
    pub fn new(repository: R, generator: G) -> Self {
        Self::with_shared(Arc::new(repository), generator)
    }

    /// Builds a service over a repository the caller keeps a handle to.
    pub fn with_shared(repository: Arc<R>, generator: G) -> Self {
        Self {
            repository,
            generator: Arc::new(generator),
        }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Reads the record owning a url, or `None` if it was deleted since the
    /// owner was looked up.
    async fn read_owner(
        &self,
        ctx: &Context,
        owner: &ShortCode,
    ) -> Result<Option<UrlRecord>, StorageError> {
        match self.repository.read(ctx, owner).await {
            Ok(record) => {
                debug!(code = %owner, url = %record.original_url, "url already shortened");
                Ok(Some(record))
            }
            Err(StorageError::KeyNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl<R: Repository, G: Generator> Shortener for ShortenerService<R, G> {
    async fn create_short_url(
        &self,
        ctx: &Context,
        original_url: &str,
    ) -> Result<Shortened, ShortenerError> {
        match self.repository.find_key_by_url(ctx, original_url).await {
            Ok(owner) => {
                if let Some(record) = self.read_owner(ctx, &owner).await? {
                    return Ok(Shortened::Existing(record));
                }
            }
            Err(StorageError::KeyNotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }

        let mut attempt = 0;
        loop {
            attempt += 1;
            let code = self.generator.generate()?;
            let record = UrlRecord::new(code, original_url);

            match self.repository.create(ctx, record).await {
                Ok(stored) => {
                    info!(code = %stored.short_code, url = %stored.original_url, "shortened url");
                    return Ok(Shortened::Created(stored));
                }
                // another caller stored the same url between our lookup and insert
                Err(StorageError::UrlExists(owner)) => match self.read_owner(ctx, &owner).await? {
                    Some(record) => return Ok(Shortened::Existing(record)),
                    // ...and deleted it again before we could read it
                    None if attempt < MAX_GENERATE_ATTEMPTS => {
                        debug!(code = %owner, attempt, "url owner vanished, retrying");
                    }
                    None => return Err(ShortenerError::KeyNotFound(owner.to_string())),
                },
                Err(StorageError::KeyExists(code)) if attempt < MAX_GENERATE_ATTEMPTS => {
                    warn!(code = %code, attempt, "generated short code collided, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn get_url_data(
        &self,
        ctx: &Context,
        code: &ShortCode,
    ) -> Result<UrlRecord, ShortenerError> {
        Ok(self.repository.read(ctx, code).await?)
    }

    async fn update_url(
        &self,
        ctx: &Context,
        code: &ShortCode,
        new_url: &str,
    ) -> Result<UrlRecord, ShortenerError> {
        let current = self.repository.read(ctx, code).await?;
        let updated = UrlRecord {
            original_url: new_url.to_owned(),
            ..current
        };
        Ok(self.repository.update(ctx, updated).await?)
    }

    async fn delete_url(&self, ctx: &Context, code: &ShortCode) -> Result<(), ShortenerError> {
        Ok(self.repository.delete(ctx, code).await?)
    }
}
