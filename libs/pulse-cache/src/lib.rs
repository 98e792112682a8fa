//! Pulse tag-aware caching layer
//!
//! Provides a consistent caching strategy across Pulse services:
//! - Unified key schema with versioning
//! - Tag-set membership for cheap bulk eviction (flush one tag, evict every
//!   member key)
//! - Entries are immutable once written: overwritten wholesale, never mutated
//!
//! The cache is a performance optimization, never a correctness dependency;
//! callers are expected to degrade to live queries when it is unavailable.

mod error;
mod keys;

pub mod memory;

pub use error::{CacheError, CacheResult};
pub use keys::{CacheKey, CACHE_VERSION};
pub use memory::MemoryCache;

use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Pipeline};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

/// Core cache operations, injected as a capability (`Arc<dyn CacheOperations>`).
///
/// Values are JSON strings; the typed helpers on `dyn CacheOperations` wrap
/// serialization. Keys written with `tags` become members of each tag set and
/// are evicted together when the tag is flushed.
#[async_trait::async_trait]
pub trait CacheOperations: Send + Sync {
    /// Get the raw value stored under `key`, if present and unexpired.
    async fn get_raw(&self, key: &str) -> CacheResult<Option<String>>;

    /// Store `value` under `key` with a TTL, registering it in every tag set.
    async fn set_raw(
        &self,
        key: &str,
        value: &str,
        ttl_secs: u64,
        tags: &[String],
    ) -> CacheResult<()>;

    /// Delete a single key.
    async fn del(&self, key: &str) -> CacheResult<()>;

    /// Check if a key exists (and is unexpired).
    async fn exists(&self, key: &str) -> CacheResult<bool>;

    /// Evict every key registered under `tag`, then drop the tag set itself.
    /// Returns the number of member keys evicted.
    async fn flush_tag(&self, tag: &str) -> CacheResult<usize>;
}

impl dyn CacheOperations {
    /// Typed get: deserializes the cached JSON value.
    ///
    /// A corrupted entry is deleted and reported as a miss rather than an
    /// error, so a bad write can never wedge a key until its TTL.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> CacheResult<Option<T>> {
        match self.get_raw(key).await? {
            Some(data) => match serde_json::from_str::<T>(&data) {
                Ok(value) => Ok(Some(value)),
                Err(e) => {
                    warn!(key = %key, error = %e, "Cache deserialization failed, dropping entry");
                    let _ = self.del(key).await;
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Typed set: serializes `value` to JSON and stores it with `ttl_secs`.
    pub async fn set_json<T: Serialize + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl_secs: u64,
        tags: &[String],
    ) -> CacheResult<()> {
        let data = serde_json::to_string(value)?;
        self.set_raw(key, &data, ttl_secs, tags).await
    }
}

/// Redis-backed cache client.
///
/// `ConnectionManager` multiplexes over one connection and is cheap to clone
/// per call.
#[derive(Clone)]
pub struct RedisCache {
    redis: ConnectionManager,
}

impl RedisCache {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }

    /// Open a Redis connection and build the cache client.
    pub async fn connect(redis_url: &str) -> CacheResult<Self> {
        let client = redis::Client::open(redis_url)?;
        let manager = ConnectionManager::new(client).await?;
        Ok(Self::new(manager))
    }

    /// Ping Redis to check connection health.
    pub async fn ping(&self) -> CacheResult<()> {
        let mut conn = self.redis.clone();
        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl CacheOperations for RedisCache {
    async fn get_raw(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.redis.clone();
        let value: Option<String> = conn.get(key).await?;
        match &value {
            Some(_) => debug!(key = %key, "Cache hit"),
            None => debug!(key = %key, "Cache miss"),
        }
        Ok(value)
    }

    async fn set_raw(
        &self,
        key: &str,
        value: &str,
        ttl_secs: u64,
        tags: &[String],
    ) -> CacheResult<()> {
        let mut conn = self.redis.clone();
        let mut pipe = Pipeline::new();
        pipe.set_ex(key, value, ttl_secs);
        // Tag sets carry no TTL of their own: flushing a tag removes the set,
        // and DEL on an already-expired member is a no-op.
        for tag in tags {
            pipe.sadd(tag, key);
        }
        pipe.query_async::<_, ()>(&mut conn).await?;

        debug!(key = %key, ttl = ttl_secs, tags = tags.len(), "Cache set");
        Ok(())
    }

    async fn del(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.redis.clone();
        conn.del::<_, ()>(key).await?;
        debug!(key = %key, "Cache delete");
        Ok(())
    }

    async fn exists(&self, key: &str) -> CacheResult<bool> {
        let mut conn = self.redis.clone();
        let exists: bool = conn.exists(key).await?;
        Ok(exists)
    }

    async fn flush_tag(&self, tag: &str) -> CacheResult<usize> {
        let mut conn = self.redis.clone();
        let members: Vec<String> = conn.smembers(tag).await?;

        let mut pipe = Pipeline::new();
        for key in &members {
            pipe.del(key);
        }
        pipe.del(tag);
        pipe.query_async::<_, ()>(&mut conn).await?;

        debug!(tag = %tag, evicted = members.len(), "Cache tag flush");
        Ok(members.len())
    }
}
