//! Postgres post store and feed query builder.
//!
//! Both feed orderings are total: ties on the primary key fall through to
//! `created_at DESC` and finally `id DESC`, so any two posts have a
//! deterministic winner and cursor boundaries never skip or duplicate rows.

use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::models::{CursorBoundary, FeedPost, Post};
use crate::error::{AppError, Result};
use crate::services::ranking::EngagementWeights;

use super::PostStore;

/// Selects post rows together with their derived engagement counts.
const POSTS_WITH_COUNTS: &str = r#"
    SELECT p.id, p.user_id, p.title, p.content, p.image_url, p.created_at, p.updated_at,
           (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS like_count,
           (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comment_count
    FROM posts p
"#;

#[derive(Clone)]
pub struct PgPostStore {
    pool: PgPool,
}

impl PgPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl PostStore for PgPostStore {
    async fn create_post(
        &self,
        user_id: Uuid,
        title: &str,
        content: &str,
        image_url: Option<&str>,
    ) -> Result<Post> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (user_id, title, content, image_url)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, title, content, image_url, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(title)
        .bind(content)
        .bind(image_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }

    async fn delete_post(&self, post_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(post_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_post_with_counts(&self, post_id: Uuid) -> Result<Option<FeedPost>> {
        let sql = format!("{} WHERE p.id = $1", POSTS_WITH_COUNTS);
        let post = sqlx::query_as::<_, FeedPost>(&sql)
            .bind(post_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(post)
    }

    async fn query_personalized(
        &self,
        author_ids: &[Uuid],
        boundary: Option<&CursorBoundary>,
        fetch_limit: i64,
    ) -> Result<Vec<FeedPost>> {
        let posts = match boundary {
            Some(boundary) => {
                let sql = format!(
                    r#"{}
                    WHERE p.user_id = ANY($1)
                      AND (p.created_at < $2
                       OR (p.created_at = $2 AND p.id < $3))
                    ORDER BY p.created_at DESC, p.id DESC
                    LIMIT $4
                    "#,
                    POSTS_WITH_COUNTS
                );
                sqlx::query_as::<_, FeedPost>(&sql)
                    .bind(author_ids)
                    .bind(boundary.created_at)
                    .bind(boundary.id)
                    .bind(fetch_limit)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    r#"{}
                    WHERE p.user_id = ANY($1)
                    ORDER BY p.created_at DESC, p.id DESC
                    LIMIT $2
                    "#,
                    POSTS_WITH_COUNTS
                );
                sqlx::query_as::<_, FeedPost>(&sql)
                    .bind(author_ids)
                    .bind(fetch_limit)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(posts)
    }

    async fn query_public(
        &self,
        weights: EngagementWeights,
        boundary: Option<&CursorBoundary>,
        fetch_limit: i64,
    ) -> Result<Vec<FeedPost>> {
        // The score term must appear verbatim in both ORDER BY and the
        // boundary predicate; it is rendered once by EngagementWeights.
        let term = weights.sql_term();

        let posts = match boundary {
            Some(boundary) => {
                let score = boundary.score.ok_or_else(|| {
                    AppError::Internal("public feed boundary missing score".to_string())
                })?;
                let sql = format!(
                    r#"
                    SELECT * FROM ({base}) feed
                    WHERE ({term} < $1
                       OR ({term} = $1 AND created_at < $2)
                       OR ({term} = $1 AND created_at = $2 AND id < $3))
                    ORDER BY {term} DESC, created_at DESC, id DESC
                    LIMIT $4
                    "#,
                    base = POSTS_WITH_COUNTS,
                    term = term,
                );
                sqlx::query_as::<_, FeedPost>(&sql)
                    .bind(score)
                    .bind(boundary.created_at)
                    .bind(boundary.id)
                    .bind(fetch_limit)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    r#"
                    SELECT * FROM ({base}) feed
                    ORDER BY {term} DESC, created_at DESC, id DESC
                    LIMIT $1
                    "#,
                    base = POSTS_WITH_COUNTS,
                    term = term,
                );
                sqlx::query_as::<_, FeedPost>(&sql)
                    .bind(fetch_limit)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(posts)
    }

    async fn count_by_authors(&self, author_ids: &[Uuid]) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE user_id = ANY($1)")
            .bind(author_ids)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
