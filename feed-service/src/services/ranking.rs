//! Engagement scoring for the public feed.
//!
//! The score formula exists exactly once: `score` is the Rust evaluation and
//! `sql_term` the SQL rendering, both derived from the same pair of weights.
//! The public feed's ORDER BY, its cursor boundary predicate and the
//! cursor-anchor recomputation all go through this type; a second copy of the
//! formula anywhere would let the two drift and silently skip or duplicate
//! rows across page boundaries.

use crate::config::FeedConfig;

/// Integer weights applied to a post's like and comment counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngagementWeights {
    pub like: i64,
    pub comment: i64,
}

impl Default for EngagementWeights {
    fn default() -> Self {
        Self {
            like: 2,
            comment: 3,
        }
    }
}

impl EngagementWeights {
    pub fn from_config(feed: &FeedConfig) -> Self {
        Self {
            like: feed.like_weight,
            comment: feed.comment_weight,
        }
    }

    /// Engagement score of a post. Pure and deterministic.
    pub fn score(&self, like_count: i64, comment_count: i64) -> i64 {
        like_count * self.like + comment_count * self.comment
    }

    /// The same formula as SQL text over the `like_count`/`comment_count`
    /// columns of the ranked subquery. Weights are integers owned by this
    /// type, so inlining them is safe.
    pub fn sql_term(&self) -> String {
        format!(
            "(like_count * {} + comment_count * {})",
            self.like, self.comment
        )
    }
}
