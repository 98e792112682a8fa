//! Cache invalidation for write paths.
//!
//! Invalidation runs after the triggering write commits and is deliberately
//! infallible from the caller's point of view: failures are logged and
//! swallowed, never propagated to the writer. Until invalidation completes
//! (or the TTL expires) stale pages may still be served; that window is the
//! accepted staleness bound.

use std::sync::Arc;

use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::repository::FollowGraph;
use pulse_cache::{CacheKey, CacheOperations};

#[derive(Clone)]
pub struct CacheInvalidator {
    cache: Arc<dyn CacheOperations>,
    graph: Arc<dyn FollowGraph>,
}

impl CacheInvalidator {
    pub fn new(cache: Arc<dyn CacheOperations>, graph: Arc<dyn FollowGraph>) -> Self {
        Self { cache, graph }
    }

    /// Evict every cached personalized-feed page of one user, across all
    /// cursor/limit variants.
    pub async fn invalidate_user_feed(&self, user_id: Uuid) {
        let tag = CacheKey::user_feed_tag(user_id);
        match self.cache.flush_tag(&tag).await {
            Ok(evicted) => {
                debug!(user_id = %user_id, evicted, "Feed cache invalidated");
            }
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Failed to invalidate feed cache");
            }
        }
    }

    /// React to `author_id` publishing (or removing) a post: evict each
    /// follower's personalized feed, then the whole public feed, since the
    /// trending order changed for everyone.
    pub async fn invalidate_follower_feeds(&self, author_id: Uuid) {
        let followers = match self.graph.follower_ids(author_id).await {
            Ok(followers) => followers,
            Err(e) => {
                error!(author_id = %author_id, error = %e,
                    "Failed to resolve followers for invalidation");
                Vec::new()
            }
        };

        let followers_count = followers.len();
        for follower_id in followers {
            self.invalidate_user_feed(follower_id).await;
        }

        match self.cache.flush_tag(&CacheKey::public_feed_tag()).await {
            Ok(evicted) => {
                debug!(author_id = %author_id, evicted, "Public feed cache invalidated");
            }
            Err(e) => {
                warn!(author_id = %author_id, error = %e,
                    "Failed to invalidate public feed cache");
            }
        }

        debug!(author_id = %author_id, followers_count, "Follower feeds invalidated");
    }
}
