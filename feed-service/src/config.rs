use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub feed: FeedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    pub url: String,
}

/// Feed generation tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// TTL for cached feed pages, in seconds.
    pub cache_ttl_secs: u64,
    /// Hard upper bound on posts per page.
    pub max_posts: u32,
    /// Page size used when the request doesn't specify one.
    pub default_limit: u32,
    /// Engagement score weight per like.
    pub like_weight: i64,
    /// Engagement score weight per comment.
    pub comment_weight: i64,
    /// When false, every feed read goes straight to the store.
    pub cache_enabled: bool,
    pub strategy: FeedStrategy,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 300,
            max_posts: 50,
            default_limit: 15,
            like_weight: 2,
            comment_weight: 3,
            cache_enabled: true,
            strategy: FeedStrategy::FanOutOnRead,
        }
    }
}

/// Feed assembly strategy. Only fan-out-on-read is implemented; the write
/// variant is recognized so deployments can name it ahead of time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedStrategy {
    FanOutOnRead,
    FanOutOnWrite,
}

impl FeedStrategy {
    pub fn as_str(&self) -> &str {
        match self {
            Self::FanOutOnRead => "fan_out_on_read",
            Self::FanOutOnWrite => "fan_out_on_write",
        }
    }
}

impl std::str::FromStr for FeedStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fan_out_on_read" => Ok(Self::FanOutOnRead),
            "fan_out_on_write" => Ok(Self::FanOutOnWrite),
            other => Err(format!("unknown feed strategy: {}", other)),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Config {
            app: AppConfig {
                env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                port: std::env::var("APP_PORT")
                    .unwrap_or_else(|_| "8080".to_string())
                    .parse()?,
                log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")?,
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()?,
            },
            redis: RedisConfig {
                url: std::env::var("REDIS_URL")
                    .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string()),
            },
            feed: FeedConfig {
                cache_ttl_secs: std::env::var("FEED_CACHE_TTL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(300),
                max_posts: std::env::var("FEED_MAX_POSTS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(50),
                default_limit: std::env::var("FEED_DEFAULT_LIMIT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(15),
                like_weight: std::env::var("FEED_LIKE_WEIGHT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(2),
                comment_weight: std::env::var("FEED_COMMENT_WEIGHT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(3),
                cache_enabled: std::env::var("FEED_CACHE_ENABLED")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(true),
                strategy: std::env::var("FEED_STRATEGY")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(FeedStrategy::FanOutOnRead),
            },
        })
    }
}
