pub mod cursor;
pub mod feed;
pub mod invalidation;
pub mod ranking;

pub use feed::FeedService;
pub use invalidation::CacheInvalidator;
pub use ranking::EngagementWeights;
