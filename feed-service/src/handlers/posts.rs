//! Post write endpoints. The content CRUD itself is routine; what matters
//! here is that every successful write triggers follower-feed invalidation
//! after it commits, and that invalidation failures never fail the write.

use actix_web::{delete, post, web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::handlers::AppState;
use crate::middleware::UserId;

const MAX_TITLE_LEN: usize = 255;

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
}

impl CreatePostRequest {
    fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("title is required".to_string()));
        }
        if self.title.len() > MAX_TITLE_LEN {
            return Err(AppError::Validation(format!(
                "title must be at most {} characters",
                MAX_TITLE_LEN
            )));
        }
        if self.content.trim().is_empty() {
            return Err(AppError::Validation("content is required".to_string()));
        }
        Ok(())
    }
}

#[post("/posts")]
pub async fn create_post(
    body: web::Json<CreatePostRequest>,
    user: UserId,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    body.validate()?;

    let post = state
        .posts
        .create_post(
            user.0,
            body.title.trim(),
            &body.content,
            body.image_url.as_deref(),
        )
        .await?;

    // A new post changes every follower's feed and the trending order.
    state.feed.invalidator().invalidate_follower_feeds(user.0).await;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "message": "Post created successfully",
        "data": post,
    })))
}

#[delete("/posts/{post_id}")]
pub async fn delete_post(
    path: web::Path<Uuid>,
    user: UserId,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let post_id = path.into_inner();

    let post = state
        .posts
        .find_post_with_counts(post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {}", post_id)))?;

    if post.user_id != user.0 {
        return Err(AppError::Forbidden(
            "You can only delete your own posts".to_string(),
        ));
    }

    state.posts.delete_post(post_id).await?;
    state.feed.invalidator().invalidate_follower_feeds(user.0).await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Post deleted successfully",
    })))
}
