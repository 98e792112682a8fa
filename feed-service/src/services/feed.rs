//! Feed assembly (fan-out on read).
//!
//! A feed page is assembled at request time: resolve the follow graph,
//! query the post store under the feed's total order, annotate with the
//! viewer's like state, detect whether more pages exist, and memoize the
//! finished page in the cache under a key derived from the full request
//! shape. The cache is an optimization only; any cache failure degrades to
//! a live query.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::FeedConfig;
use crate::domain::models::{FeedPage, FeedPost, FeedStats, FeedType};
use crate::error::{AppError, Result};
use crate::repository::{FollowGraph, LikeStore, PostStore};
use crate::services::cursor::{self, resolve_boundary};
use crate::services::invalidation::CacheInvalidator;
use crate::services::ranking::EngagementWeights;
use pulse_cache::{CacheKey, CacheOperations};

#[derive(Clone)]
pub struct FeedService {
    posts: Arc<dyn PostStore>,
    graph: Arc<dyn FollowGraph>,
    likes: Arc<dyn LikeStore>,
    cache: Arc<dyn CacheOperations>,
    invalidator: CacheInvalidator,
    config: FeedConfig,
    weights: EngagementWeights,
}

impl FeedService {
    pub fn new(
        posts: Arc<dyn PostStore>,
        graph: Arc<dyn FollowGraph>,
        likes: Arc<dyn LikeStore>,
        cache: Arc<dyn CacheOperations>,
        config: FeedConfig,
    ) -> Self {
        let weights = EngagementWeights::from_config(&config);
        let invalidator = CacheInvalidator::new(Arc::clone(&cache), Arc::clone(&graph));
        Self {
            posts,
            graph,
            likes,
            cache,
            invalidator,
            config,
            weights,
        }
    }

    pub fn invalidator(&self) -> &CacheInvalidator {
        &self.invalidator
    }

    /// Posts from the user's followed authors, newest first.
    pub async fn get_personalized_feed(
        &self,
        user_id: Uuid,
        limit: Option<u32>,
        cursor: Option<&str>,
    ) -> Result<FeedPage> {
        let limit = self.clamp_limit(limit);
        let key = CacheKey::personalized_feed(user_id, limit, cursor);

        if let Some(page) = self.cache_get(&key).await {
            return Ok(page);
        }

        let page = self.build_personalized_feed(user_id, limit, cursor).await?;

        let tags = vec![CacheKey::user_feed_tag(user_id)];
        self.cache_put(&key, &page, &tags).await;
        Ok(page)
    }

    /// All posts ranked by engagement. The viewer is optional; like-state
    /// annotation is present only when one is supplied.
    pub async fn get_public_feed(
        &self,
        limit: Option<u32>,
        cursor: Option<&str>,
        viewer: Option<Uuid>,
    ) -> Result<FeedPage> {
        let limit = self.clamp_limit(limit);
        let key = CacheKey::public_feed(limit, cursor, viewer);

        if let Some(page) = self.cache_get(&key).await {
            return Ok(page);
        }

        let page = self.build_public_feed(limit, cursor, viewer).await?;

        let tags = vec![CacheKey::public_feed_tag()];
        self.cache_put(&key, &page, &tags).await;
        Ok(page)
    }

    /// Cheap availability signal: graph degree plus how many posts the
    /// user's following set has authored in total.
    pub async fn get_feed_stats(&self, user_id: Uuid) -> Result<FeedStats> {
        let following = self.graph.following_ids(user_id).await?;
        let followers_count = self.graph.followers_count(user_id).await?;

        let feed_posts_available = if following.is_empty() {
            0
        } else {
            self.posts.count_by_authors(&following).await?
        };

        Ok(FeedStats {
            following_count: following.len() as i64,
            followers_count,
            feed_posts_available,
        })
    }

    /// Drop the user's cached pages, then rebuild the first page live. The
    /// eviction precedes the read on every call, so back-to-back refreshes
    /// each observe a cache miss.
    pub async fn refresh_feed(&self, user_id: Uuid) -> Result<FeedPage> {
        self.invalidator.invalidate_user_feed(user_id).await;
        info!(user_id = %user_id, "Feed cache refreshed");
        self.get_personalized_feed(user_id, None, None).await
    }

    async fn build_personalized_feed(
        &self,
        user_id: Uuid,
        limit: u32,
        cursor: Option<&str>,
    ) -> Result<FeedPage> {
        let following = self.graph.following_ids(user_id).await?;

        if following.is_empty() {
            info!(user_id = %user_id, "User follows no one, returning empty feed");
            return Ok(FeedPage::empty());
        }

        let boundary = match cursor {
            Some(token) => {
                match resolve_boundary(
                    self.posts.as_ref(),
                    self.weights,
                    FeedType::Personalized,
                    token,
                )
                .await
                {
                    Ok(boundary) => Some(boundary),
                    // The anchor post was deleted out from under the reader;
                    // there is nothing to resume from.
                    Err(AppError::CursorNotFound(post_id)) => {
                        debug!(user_id = %user_id, post_id = %post_id,
                            "Cursor post gone, treating as end of feed");
                        return Ok(FeedPage::empty());
                    }
                    Err(e) => return Err(e),
                }
            }
            None => None,
        };

        let rows = self
            .posts
            .query_personalized(&following, boundary.as_ref(), i64::from(limit) + 1)
            .await?;

        let page = self.package(rows, limit, Some(user_id)).await?;
        info!(
            user_id = %user_id,
            following_count = following.len(),
            posts = page.posts.len(),
            has_more = page.has_more,
            "Personalized feed built"
        );
        Ok(page)
    }

    async fn build_public_feed(
        &self,
        limit: u32,
        cursor: Option<&str>,
        viewer: Option<Uuid>,
    ) -> Result<FeedPage> {
        let boundary = match cursor {
            Some(token) => {
                match resolve_boundary(self.posts.as_ref(), self.weights, FeedType::Public, token)
                    .await
                {
                    Ok(boundary) => Some(boundary),
                    Err(AppError::CursorNotFound(post_id)) => {
                        debug!(post_id = %post_id, "Cursor post gone, treating as end of feed");
                        return Ok(FeedPage::empty());
                    }
                    Err(e) => return Err(e),
                }
            }
            None => None,
        };

        let rows = self
            .posts
            .query_public(self.weights, boundary.as_ref(), i64::from(limit) + 1)
            .await?;

        let page = self.package(rows, limit, viewer).await?;
        info!(
            posts = page.posts.len(),
            has_more = page.has_more,
            "Public feed built"
        );
        Ok(page)
    }

    /// Truncate the `limit + 1` fetch, annotate like state for the viewer,
    /// and derive the next cursor from the last returned post. A page that
    /// reaches the end never offers a cursor.
    async fn package(
        &self,
        mut rows: Vec<FeedPost>,
        limit: u32,
        viewer: Option<Uuid>,
    ) -> Result<FeedPage> {
        let has_more = rows.len() > limit as usize;
        rows.truncate(limit as usize);

        if let Some(viewer) = viewer {
            let ids: Vec<Uuid> = rows.iter().map(|p| p.id).collect();
            let liked = self.likes.batch_check_liked(viewer, &ids).await?;
            for post in &mut rows {
                post.is_liked = Some(liked.get(&post.id).copied().unwrap_or(false));
            }
        }

        let next_cursor = if has_more {
            rows.last().map(|p| cursor::encode_cursor(p.id))
        } else {
            None
        };

        Ok(FeedPage {
            posts: rows,
            next_cursor,
            has_more,
        })
    }

    fn clamp_limit(&self, limit: Option<u32>) -> u32 {
        limit
            .unwrap_or(self.config.default_limit)
            .clamp(1, self.config.max_posts)
    }

    async fn cache_get(&self, key: &str) -> Option<FeedPage> {
        if !self.config.cache_enabled {
            return None;
        }
        match self.cache.get_json::<FeedPage>(key).await {
            Ok(hit) => hit,
            Err(e) => {
                warn!(key = %key, error = %e, "Cache read failed, serving live query");
                None
            }
        }
    }

    async fn cache_put(&self, key: &str, page: &FeedPage, tags: &[String]) {
        if !self.config.cache_enabled {
            return;
        }
        if let Err(e) = self
            .cache
            .set_json(key, page, self.config.cache_ttl_secs, tags)
            .await
        {
            warn!(key = %key, error = %e, "Cache write failed, result not memoized");
        }
    }
}
