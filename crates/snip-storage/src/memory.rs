use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use parking_lot::RwLock;
use snip_core::repository::Result;
use snip_core::{Context, Repository, ShortCode, StorageError, UrlRecord};
use std::collections::HashMap;
use std::num::NonZeroUsize;
use tracing::{debug, info, warn};

pub const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1000) {
    Some(capacity) => capacity,
    None => unreachable!(),
};

/// Both directions of the mapping. They are only ever touched together,
/// under the same lock, so they cannot disagree.
///
/// `create` keeps one code per URL, but `update` may point a second code at
/// a URL that is already stored, so each URL lists its codes in the order
/// they arrived. The first entry is the owner `find_key_by_url` reports.
#[derive(Debug, Default)]
struct Tables {
    records: HashMap<ShortCode, UrlRecord>,
    by_url: HashMap<String, Vec<ShortCode>>,
}

impl Tables {
    fn owner_of(&self, url: &str) -> Option<&ShortCode> {
        self.by_url.get(url).and_then(|codes| codes.first())
    }

    fn link(&mut self, url: &str, code: &ShortCode) {
        self.by_url
            .entry(url.to_owned())
            .or_default()
            .push(code.clone());
    }

    fn unlink(&mut self, url: &str, code: &ShortCode) {
        if let Some(codes) = self.by_url.get_mut(url) {
            codes.retain(|c| c != code);
            if codes.is_empty() {
                self.by_url.remove(url);
            }
        }
    }
}

/// In-memory implementation of the Repository trait.
///
/// A single `RwLock` guards the records and the reverse index. Reads share
/// the lock; `create`, `update` and `delete` hold it exclusively across the
/// whole check-then-act sequence, so two racing creates for the same code
/// produce exactly one success, and the live count can never pass
/// `capacity`.
#[derive(Debug)]
pub struct InMemoryRepository {
    tables: RwLock<Tables>,
    capacity: NonZeroUsize,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a new in-memory repository holding at most `capacity` records.
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            tables: RwLock::new(Tables {
                // pre-size for small stores only; large capacities grow on demand
                records: HashMap::with_capacity(capacity.get().min(1024)),
                by_url: HashMap::with_capacity(capacity.get().min(1024)),
            }),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.tables.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

/// `updated_at` must move strictly forward, even if the wall clock has not
/// ticked since the previous stamp.
fn next_stamp(previous: Timestamp) -> Timestamp {
    let now = Timestamp::now();
    if now > previous {
        return now;
    }
    previous
        .checked_add(SignedDuration::from_nanos(1))
        .unwrap_or(previous)
}

fn interrupted(ctx: &Context, op: &'static str, key: &str) -> Result<()> {
    ctx.check().map_err(|reason| {
        warn!(op, key, %reason, "storage operation interrupted");
        StorageError::Interrupted(reason)
    })
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn create(&self, ctx: &Context, record: UrlRecord) -> Result<UrlRecord> {
        interrupted(ctx, "create", record.short_code.as_str())?;

        let mut tables = self.tables.write();

        if tables.records.len() >= self.capacity.get() {
            warn!(code = %record.short_code, capacity = self.capacity.get(), "storage capacity reached");
            return Err(StorageError::CapacityReached(self.capacity.get()));
        }
        if tables.records.contains_key(&record.short_code) {
            warn!(code = %record.short_code, "short code already exists");
            return Err(StorageError::KeyExists(record.short_code));
        }
        if let Some(owner) = tables.owner_of(&record.original_url) {
            debug!(code = %owner, url = %record.original_url, "url already stored");
            return Err(StorageError::UrlExists(owner.clone()));
        }

        let now = Timestamp::now();
        let record = UrlRecord {
            created_at: now,
            updated_at: now,
            ..record
        };

        tables.link(&record.original_url, &record.short_code);
        tables
            .records
            .insert(record.short_code.clone(), record.clone());

        info!(
            code = %record.short_code,
            url = %record.original_url,
            created_at = %record.created_at,
            "short url created"
        );
        Ok(record)
    }

    async fn read(&self, ctx: &Context, code: &ShortCode) -> Result<UrlRecord> {
        interrupted(ctx, "read", code.as_str())?;

        let tables = self.tables.read();
        match tables.records.get(code) {
            Some(record) => {
                debug!(code = %code, url = %record.original_url, "url data retrieved");
                Ok(record.clone())
            }
            None => Err(StorageError::KeyNotFound(code.to_string())),
        }
    }

    async fn find_key_by_url(&self, ctx: &Context, original_url: &str) -> Result<ShortCode> {
        interrupted(ctx, "find_key_by_url", original_url)?;

        self.tables
            .read()
            .owner_of(original_url)
            .cloned()
            .ok_or_else(|| StorageError::KeyNotFound(original_url.to_owned()))
    }

    async fn update(&self, ctx: &Context, record: UrlRecord) -> Result<UrlRecord> {
        interrupted(ctx, "update", record.short_code.as_str())?;

        let mut tables = self.tables.write();

        let Some(current) = tables.records.get_mut(&record.short_code) else {
            warn!(code = %record.short_code, "attempt to update non-existent short code");
            return Err(StorageError::KeyNotFound(record.short_code.to_string()));
        };

        let old_url = std::mem::replace(&mut current.original_url, record.original_url);
        current.updated_at = next_stamp(current.updated_at);
        let current = current.clone();

        if old_url != current.original_url {
            tables.unlink(&old_url, &current.short_code);
            tables.link(&current.original_url, &current.short_code);
        }

        info!(
            code = %current.short_code,
            old_url = %old_url,
            new_url = %current.original_url,
            updated_at = %current.updated_at,
            "short url updated"
        );
        Ok(current)
    }

    async fn delete(&self, ctx: &Context, code: &ShortCode) -> Result<()> {
        interrupted(ctx, "delete", code.as_str())?;

        let mut tables = self.tables.write();
        let Some(removed) = tables.records.remove(code) else {
            warn!(code = %code, "attempt to delete non-existent short code");
            return Err(StorageError::KeyNotFound(code.to_string()));
        };
        tables.unlink(&removed.original_url, code);

        info!(code = %code, "short url deleted");
        Ok(())
    }
}
