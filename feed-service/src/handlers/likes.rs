//! Like endpoints. Both operations are idempotent: liking twice reports
//! "already liked" without changing the count, unliking a never-liked post
//! succeeds as a no-op. Engagement-order staleness in cached public pages is
//! bounded by the cache TTL.

use actix_web::{delete, post, web, HttpResponse};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::handlers::AppState;
use crate::middleware::UserId;

async fn ensure_post_exists(state: &AppState, post_id: Uuid) -> Result<()> {
    state
        .posts
        .find_post_with_counts(post_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::NotFound(format!("post {}", post_id)))
}

#[post("/posts/{post_id}/like")]
pub async fn like_post(
    path: web::Path<Uuid>,
    user: UserId,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let post_id = path.into_inner();
    ensure_post_exists(&state, post_id).await?;

    let (_, was_created) = state.likes.create_like(user.0, post_id).await?;
    let likes_count = state.likes.like_count(post_id).await?;

    let message = if was_created {
        "Post liked successfully"
    } else {
        "Post already liked"
    };

    let body = serde_json::json!({
        "success": true,
        "message": message,
        "data": {
            "post_id": post_id,
            "is_liked": true,
            "likes_count": likes_count,
        },
    });

    Ok(if was_created {
        HttpResponse::Created().json(body)
    } else {
        HttpResponse::Ok().json(body)
    })
}

#[delete("/posts/{post_id}/like")]
pub async fn unlike_post(
    path: web::Path<Uuid>,
    user: UserId,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let post_id = path.into_inner();
    ensure_post_exists(&state, post_id).await?;

    let deleted = state.likes.delete_like(user.0, post_id).await?;
    let likes_count = state.likes.like_count(post_id).await?;

    let message = if deleted {
        "Post unliked successfully"
    } else {
        "Post was not liked"
    };

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": message,
        "data": {
            "post_id": post_id,
            "is_liked": false,
            "likes_count": likes_count,
        },
    })))
}
