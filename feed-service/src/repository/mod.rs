//! Data-access seams consumed by the feed subsystem.
//!
//! Each store is a capability trait so request handlers and the feed
//! assembler never touch a connection pool directly; production wires the
//! Postgres implementations, tests wire in-memory fakes.

pub mod follows;
pub mod likes;
pub mod posts;

pub use follows::PgFollowGraph;
pub use likes::PgLikeStore;
pub use posts::PgPostStore;

use std::collections::HashMap;

use uuid::Uuid;

use crate::domain::models::{CursorBoundary, FeedPost, Like, Post};
use crate::error::Result;
use crate::services::ranking::EngagementWeights;

/// Post store: feed queries plus the thin write paths that trigger
/// invalidation.
#[async_trait::async_trait]
pub trait PostStore: Send + Sync {
    async fn create_post(
        &self,
        user_id: Uuid,
        title: &str,
        content: &str,
        image_url: Option<&str>,
    ) -> Result<Post>;

    /// Delete a post; returns false when it didn't exist.
    async fn delete_post(&self, post_id: Uuid) -> Result<bool>;

    /// Fetch one post with its current like/comment counts (cursor anchor
    /// relocation and like/unlike responses).
    async fn find_post_with_counts(&self, post_id: Uuid) -> Result<Option<FeedPost>>;

    /// Posts authored by `author_ids`, newest first `(created_at, id)`,
    /// bounded below by `boundary` when present. Fetches at most
    /// `fetch_limit` rows; callers pass `limit + 1` to detect more pages.
    async fn query_personalized(
        &self,
        author_ids: &[Uuid],
        boundary: Option<&CursorBoundary>,
        fetch_limit: i64,
    ) -> Result<Vec<FeedPost>>;

    /// All posts ordered by `(engagement score, created_at, id)` descending,
    /// bounded below by `boundary` when present.
    async fn query_public(
        &self,
        weights: EngagementWeights,
        boundary: Option<&CursorBoundary>,
        fetch_limit: i64,
    ) -> Result<Vec<FeedPost>>;

    /// Number of posts authored by anyone in `author_ids`.
    async fn count_by_authors(&self, author_ids: &[Uuid]) -> Result<i64>;
}

/// Follow graph: one-hop id sets and idempotent edge writes.
#[async_trait::async_trait]
pub trait FollowGraph: Send + Sync {
    /// Ids the user follows.
    async fn following_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>>;

    /// Ids following the user.
    async fn follower_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>>;

    async fn following_count(&self, user_id: Uuid) -> Result<i64>;

    async fn followers_count(&self, user_id: Uuid) -> Result<i64>;

    /// Idempotent edge insert; returns true if a new edge was created.
    async fn create_follow(&self, follower_id: Uuid, following_id: Uuid) -> Result<bool>;

    /// Idempotent edge delete; returns true if an edge was removed.
    async fn delete_follow(&self, follower_id: Uuid, following_id: Uuid) -> Result<bool>;

    async fn is_following(&self, follower_id: Uuid, following_id: Uuid) -> Result<bool>;
}

/// Like store: idempotent like/unlike and viewer like-state lookups.
#[async_trait::async_trait]
pub trait LikeStore: Send + Sync {
    /// Idempotent like; returns the like row and whether it was newly
    /// created.
    async fn create_like(&self, user_id: Uuid, post_id: Uuid) -> Result<(Like, bool)>;

    /// Idempotent unlike; returns true if a like was removed.
    async fn delete_like(&self, user_id: Uuid, post_id: Uuid) -> Result<bool>;

    async fn is_liked(&self, post_id: Uuid, user_id: Uuid) -> Result<bool>;

    /// Like state of one viewer over a page of posts, in a single query.
    async fn batch_check_liked(
        &self,
        user_id: Uuid,
        post_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, bool>>;

    async fn like_count(&self, post_id: Uuid) -> Result<i64>;
}
