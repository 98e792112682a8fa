//! Feed read endpoints. Thin: parse the request shape, delegate to
//! `FeedService`, wrap the page in the response envelope.

use actix_web::{get, post, web, HttpResponse};
use serde::Deserialize;

use crate::domain::models::FeedPage;
use crate::error::Result;
use crate::handlers::AppState;
use crate::middleware::{MaybeUserId, UserId};

#[derive(Debug, Deserialize)]
pub struct FeedQueryParams {
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

fn feed_envelope(page: FeedPage, feed_type: &str, cached: bool) -> serde_json::Value {
    serde_json::json!({
        "success": true,
        "data": {
            "posts": page.posts,
            "pagination": {
                "next_cursor": page.next_cursor,
                "has_more": page.has_more,
            },
        },
        "meta": {
            "feed_type": feed_type,
            "cached": cached,
        },
    })
}

/// Personalized feed: posts from followed users, newest first.
#[get("/feed")]
pub async fn personal_feed(
    query: web::Query<FeedQueryParams>,
    user: UserId,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let page = state
        .feed
        .get_personalized_feed(user.0, query.limit, query.cursor.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(feed_envelope(page, "personalized", true)))
}

/// Public trending feed, ranked by engagement. Anonymous requests allowed.
#[get("/feed/public")]
pub async fn public_feed(
    query: web::Query<FeedQueryParams>,
    viewer: MaybeUserId,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let page = state
        .feed
        .get_public_feed(query.limit, query.cursor.as_deref(), viewer.0)
        .await?;

    Ok(HttpResponse::Ok().json(feed_envelope(page, "public", true)))
}

/// Feed availability statistics for the authenticated user.
#[get("/feed/stats")]
pub async fn feed_stats(user: UserId, state: web::Data<AppState>) -> Result<HttpResponse> {
    let stats = state.feed.get_feed_stats(user.0).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "data": stats,
    })))
}

/// Drop the user's cached feed pages and serve a freshly built first page.
#[post("/feed/refresh")]
pub async fn refresh_feed(user: UserId, state: web::Data<AppState>) -> Result<HttpResponse> {
    let page = state.feed.refresh_feed(user.0).await?;

    let mut body = feed_envelope(page, "personalized", false);
    body["message"] = serde_json::json!("Feed refreshed successfully");
    Ok(HttpResponse::Ok().json(body))
}
