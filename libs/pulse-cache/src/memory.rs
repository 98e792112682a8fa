//! In-process cache backend.
//!
//! Implements the same contract as the Redis backend over a process-local
//! map. Used by service test suites and by single-node deployments that run
//! without a Redis instance. Entries expire lazily: an expired entry is
//! removed the next time it is read.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::{CacheOperations, CacheResult};

struct Entry {
    value: String,
    expires_at: Instant,
}

#[derive(Default)]
struct Inner {
    entries: HashMap<String, Entry>,
    tags: HashMap<String, HashSet<String>>,
}

/// Process-local `CacheOperations` implementation.
#[derive(Default)]
pub struct MemoryCache {
    inner: Mutex<Inner>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl CacheOperations for MemoryCache {
    async fn get_raw(&self, key: &str) -> CacheResult<Option<String>> {
        let mut inner = self.inner.lock().expect("cache lock poisoned");
        match inner.entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.value.clone())),
            Some(_) => {
                inner.entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set_raw(
        &self,
        key: &str,
        value: &str,
        ttl_secs: u64,
        tags: &[String],
    ) -> CacheResult<()> {
        let mut inner = self.inner.lock().expect("cache lock poisoned");
        inner.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Instant::now() + Duration::from_secs(ttl_secs),
            },
        );
        for tag in tags {
            inner
                .tags
                .entry(tag.clone())
                .or_default()
                .insert(key.to_string());
        }
        Ok(())
    }

    async fn del(&self, key: &str) -> CacheResult<()> {
        let mut inner = self.inner.lock().expect("cache lock poisoned");
        inner.entries.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> CacheResult<bool> {
        Ok(self.get_raw(key).await?.is_some())
    }

    async fn flush_tag(&self, tag: &str) -> CacheResult<usize> {
        let mut inner = self.inner.lock().expect("cache lock poisoned");
        let members = inner.tags.remove(tag).unwrap_or_default();
        let mut evicted = 0;
        for key in members {
            if inner.entries.remove(&key).is_some() {
                evicted += 1;
            }
        }
        Ok(evicted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let cache = MemoryCache::new();
        cache.set_raw("k", "v", 60, &[]).await.unwrap();
        assert_eq!(cache.get_raw("k").await.unwrap().as_deref(), Some("v"));
        assert!(cache.exists("k").await.unwrap());
    }

    #[tokio::test]
    async fn zero_ttl_entry_is_already_expired() {
        let cache = MemoryCache::new();
        cache.set_raw("k", "v", 0, &[]).await.unwrap();
        assert_eq!(cache.get_raw("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn flush_tag_evicts_members_only() {
        let cache = MemoryCache::new();
        let tag = vec!["t1".to_string()];
        cache.set_raw("a", "1", 60, &tag).await.unwrap();
        cache.set_raw("b", "2", 60, &tag).await.unwrap();
        cache.set_raw("c", "3", 60, &[]).await.unwrap();

        let evicted = cache.flush_tag("t1").await.unwrap();
        assert_eq!(evicted, 2);
        assert!(!cache.exists("a").await.unwrap());
        assert!(!cache.exists("b").await.unwrap());
        assert!(cache.exists("c").await.unwrap());
    }

    #[tokio::test]
    async fn flush_missing_tag_is_noop() {
        let cache = MemoryCache::new();
        assert_eq!(cache.flush_tag("nope").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn key_in_two_tags_is_evicted_by_either() {
        let cache = MemoryCache::new();
        let tags = vec!["t1".to_string(), "t2".to_string()];
        cache.set_raw("a", "1", 60, &tags).await.unwrap();

        cache.flush_tag("t2").await.unwrap();
        assert!(!cache.exists("a").await.unwrap());
        // The other tag set may still reference the evicted key; flushing it
        // converges on the same absent state.
        assert_eq!(cache.flush_tag("t1").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn typed_helpers_round_trip_json() {
        use std::sync::Arc;
        let cache: Arc<dyn CacheOperations> = Arc::new(MemoryCache::new());
        cache
            .set_json("nums", &vec![1u32, 2, 3], 60, &[])
            .await
            .unwrap();
        let got: Option<Vec<u32>> = cache.get_json("nums").await.unwrap();
        assert_eq!(got, Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn corrupted_entry_reads_as_miss_and_is_dropped() {
        use std::sync::Arc;
        let cache: Arc<dyn CacheOperations> = Arc::new(MemoryCache::new());
        cache.set_raw("bad", "{not json", 60, &[]).await.unwrap();
        let got: Option<Vec<u32>> = cache.get_json("bad").await.unwrap();
        assert_eq!(got, None);
        assert!(!cache.exists("bad").await.unwrap());
    }
}
