//! Follow graph write endpoints. A follow/unfollow changes what the
//! follower's personalized feed contains, so their cached pages are dropped
//! after the edge write.

use actix_web::{delete, post, web, HttpResponse};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::handlers::AppState;
use crate::middleware::UserId;

#[post("/users/{user_id}/follow")]
pub async fn follow_user(
    path: web::Path<Uuid>,
    user: UserId,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let target = path.into_inner();

    if user.0 == target {
        return Err(AppError::BadRequest(
            "You cannot follow yourself".to_string(),
        ));
    }

    let created = state.graph.create_follow(user.0, target).await?;
    if !created {
        return Err(AppError::BadRequest(
            "You are already following this user".to_string(),
        ));
    }

    state.feed.invalidator().invalidate_user_feed(user.0).await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Successfully followed user",
        "data": {
            "user_id": target,
            "is_following": true,
        },
    })))
}

#[delete("/users/{user_id}/follow")]
pub async fn unfollow_user(
    path: web::Path<Uuid>,
    user: UserId,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let target = path.into_inner();

    if user.0 == target {
        return Err(AppError::BadRequest("Invalid operation".to_string()));
    }

    let deleted = state.graph.delete_follow(user.0, target).await?;
    if !deleted {
        return Err(AppError::BadRequest(
            "You are not following this user".to_string(),
        ));
    }

    state.feed.invalidator().invalidate_user_feed(user.0).await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Successfully unfollowed user",
        "data": {
            "user_id": target,
            "is_following": false,
        },
    })))
}
