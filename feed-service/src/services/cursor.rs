//! Pagination cursor codec.
//!
//! The wire cursor is the base64-encoded id of the last post of the previous
//! page: a stable, opaque anchor. Ordering keys are NOT stored in the token;
//! the boundary tuple is relocated at read time by re-fetching the anchor
//! post and recomputing its current score, so a post whose engagement changed
//! between pages is bounded by its present position, not a stale snapshot.

use base64::{engine::general_purpose, Engine as _};
use uuid::Uuid;

use crate::domain::models::{CursorBoundary, FeedType};
use crate::error::{AppError, Result};
use crate::repository::PostStore;
use crate::services::ranking::EngagementWeights;

/// Encode a post id as an opaque wire cursor.
pub fn encode_cursor(post_id: Uuid) -> String {
    general_purpose::STANDARD.encode(post_id.to_string())
}

/// Decode a wire cursor back to the anchor post id.
pub fn decode_cursor(token: &str) -> Result<Uuid> {
    let decoded = general_purpose::STANDARD
        .decode(token)
        .map_err(|_| AppError::Validation("Invalid cursor format".to_string()))?;
    let id_str = String::from_utf8(decoded)
        .map_err(|_| AppError::Validation("Invalid cursor encoding".to_string()))?;
    Uuid::parse_str(&id_str).map_err(|_| AppError::Validation("Invalid cursor value".to_string()))
}

/// Resolve a wire cursor into the boundary tuple for `feed_type`.
///
/// Returns `AppError::CursorNotFound` when the anchor post has been deleted;
/// the caller decides whether that means end-of-feed or an error.
pub async fn resolve_boundary(
    store: &dyn PostStore,
    weights: EngagementWeights,
    feed_type: FeedType,
    token: &str,
) -> Result<CursorBoundary> {
    let post_id = decode_cursor(token)?;
    let anchor = store
        .find_post_with_counts(post_id)
        .await?
        .ok_or(AppError::CursorNotFound(post_id))?;

    let score = match feed_type {
        FeedType::Public => Some(weights.score(anchor.like_count, anchor.comment_count)),
        FeedType::Personalized => None,
    };

    Ok(CursorBoundary {
        score,
        created_at: anchor.created_at,
        id: anchor.id,
    })
}
