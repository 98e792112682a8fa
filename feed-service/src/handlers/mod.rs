pub mod feed;
pub mod follows;
pub mod likes;
pub mod posts;

pub use feed::{feed_stats, personal_feed, public_feed, refresh_feed};
pub use follows::{follow_user, unfollow_user};
pub use likes::{like_post, unlike_post};
pub use posts::{create_post, delete_post};

use std::sync::Arc;

use crate::repository::{FollowGraph, LikeStore, PostStore};
use crate::services::FeedService;

/// Shared handler state, injected once at startup.
pub struct AppState {
    pub feed: FeedService,
    pub posts: Arc<dyn PostStore>,
    pub graph: Arc<dyn FollowGraph>,
    pub likes: Arc<dyn LikeStore>,
}
