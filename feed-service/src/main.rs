use std::io;
use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use feed_service::config::{Config, FeedStrategy};
use feed_service::handlers::{
    create_post, delete_post, feed_stats, follow_user, like_post, personal_feed, public_feed,
    refresh_feed, unfollow_user, unlike_post, AppState,
};
use feed_service::repository::{PgFollowGraph, PgLikeStore, PgPostStore};
use feed_service::services::FeedService;
use pulse_cache::{CacheOperations, RedisCache};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_line_number(true)
                .with_file(true),
        )
        .init();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {:#}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting feed-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    if config.feed.strategy == FeedStrategy::FanOutOnWrite {
        tracing::warn!(
            "Feed strategy 'fan_out_on_write' is not implemented; using fan_out_on_read"
        );
    }

    let pool = match PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Database pool creation failed: {:#}", e);
            eprintln!("ERROR: Failed to create database pool: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = sqlx::migrate!("./migrations").run(&pool).await {
        tracing::error!("Database migration failed: {:#}", e);
        eprintln!("ERROR: Failed to run migrations: {}", e);
        std::process::exit(1);
    }

    // The cache connection lives for the whole process; feed reads degrade to
    // live queries if Redis goes away later.
    let cache: Arc<dyn CacheOperations> = match RedisCache::connect(&config.redis.url).await {
        Ok(cache) => Arc::new(cache),
        Err(e) => {
            tracing::error!("Redis connection failed: {:#}", e);
            eprintln!("ERROR: Failed to connect to Redis: {}", e);
            std::process::exit(1);
        }
    };

    let posts = Arc::new(PgPostStore::new(pool.clone()));
    let graph = Arc::new(PgFollowGraph::new(pool.clone()));
    let likes = Arc::new(PgLikeStore::new(pool.clone()));

    let feed = FeedService::new(
        posts.clone(),
        graph.clone(),
        likes.clone(),
        Arc::clone(&cache),
        config.feed.clone(),
    );

    let state = web::Data::new(AppState {
        feed,
        posts,
        graph,
        likes,
    });

    tracing::info!(
        port = config.app.port,
        strategy = config.feed.strategy.as_str(),
        cache_enabled = config.feed.cache_enabled,
        "feed-service listening"
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .route("/health", web::get().to(|| async { "OK" }))
            .service(
                web::scope("/api/v1")
                    .service(personal_feed)
                    .service(public_feed)
                    .service(feed_stats)
                    .service(refresh_feed)
                    .service(create_post)
                    .service(delete_post)
                    .service(follow_user)
                    .service(unfollow_user)
                    .service(like_post)
                    .service(unlike_post),
            )
    })
    .bind(("0.0.0.0", config.app.port))?
    .run()
    .await
}
