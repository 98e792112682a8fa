use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity as stored
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Post as it appears in a feed page: the stored row plus its derived
/// engagement counts, and the viewer's like state when a viewer is known.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FeedPost {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub like_count: i64,
    pub comment_count: i64,
    /// Absent for unauthenticated requests.
    #[sqlx(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_liked: Option<bool>,
}

/// Like entity - represents a user liking a post
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Like {
    pub id: Uuid,
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Directed follow edge: follower -> following
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FollowEdge {
    pub id: Uuid,
    pub follower_id: Uuid,
    pub following_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// One page of a feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedPage {
    pub posts: Vec<FeedPost>,
    /// Opaque cursor for the next page; `None` at end-of-feed.
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

impl FeedPage {
    pub fn empty() -> Self {
        Self {
            posts: Vec::new(),
            next_cursor: None,
            has_more: false,
        }
    }
}

/// Composite sort/boundary key of the last-seen post, used to bound the next
/// page. `score` is present only under the public feed's ordering. Relocated
/// at read time from the referenced post; never stored in the wire cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorBoundary {
    pub score: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub id: Uuid,
}

/// Feed availability summary for a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedStats {
    pub following_count: i64,
    pub followers_count: i64,
    pub feed_posts_available: i64,
}

/// The two feed variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedType {
    Personalized,
    Public,
}

impl FeedType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Personalized => "personalized",
            Self::Public => "public",
        }
    }
}

impl std::fmt::Display for FeedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
