//! Unified cache key schema
//!
//! All services must build keys and tags through these generators so that
//! write paths and invalidation paths agree on the exact strings.
//! Key format: v{VERSION}:{entity}:{identifier}[:sub_key]

use uuid::Uuid;

/// Cache schema version - increment when changing key formats
pub const CACHE_VERSION: u32 = 1;

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Personalized feed page for a user.
    /// Format: v1:feed:user:{user_id}:limit:{limit}[:cursor:{cursor}]
    pub fn personalized_feed(user_id: Uuid, limit: u32, cursor: Option<&str>) -> String {
        match cursor {
            Some(cursor) => format!(
                "v{}:feed:user:{}:limit:{}:cursor:{}",
                CACHE_VERSION, user_id, limit, cursor
            ),
            None => format!("v{}:feed:user:{}:limit:{}", CACHE_VERSION, user_id, limit),
        }
    }

    /// Public feed page. The viewer id is part of the key because pages are
    /// annotated with the viewer's like state before being cached.
    /// Format: v1:feed:public:limit:{limit}[:cursor:{cursor}][:viewer:{user_id}]
    pub fn public_feed(limit: u32, cursor: Option<&str>, viewer: Option<Uuid>) -> String {
        let mut key = format!("v{}:feed:public:limit:{}", CACHE_VERSION, limit);
        if let Some(cursor) = cursor {
            key.push_str(&format!(":cursor:{}", cursor));
        }
        if let Some(viewer) = viewer {
            key.push_str(&format!(":viewer:{}", viewer));
        }
        key
    }

    /// Tag grouping every personalized-feed page of one user.
    pub fn user_feed_tag(user_id: Uuid) -> String {
        format!("v{}:tag:feed:user:{}", CACHE_VERSION, user_id)
    }

    /// Tag grouping every public-feed page.
    pub fn public_feed_tag() -> String {
        format!("v{}:tag:feed:public", CACHE_VERSION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uid(s: &str) -> Uuid {
        Uuid::parse_str(s).unwrap()
    }

    #[test]
    fn test_personalized_feed_key() {
        let user = uid("550e8400-e29b-41d4-a716-446655440000");
        assert_eq!(
            CacheKey::personalized_feed(user, 15, None),
            "v1:feed:user:550e8400-e29b-41d4-a716-446655440000:limit:15"
        );
        assert_eq!(
            CacheKey::personalized_feed(user, 15, Some("abc")),
            "v1:feed:user:550e8400-e29b-41d4-a716-446655440000:limit:15:cursor:abc"
        );
    }

    #[test]
    fn test_public_feed_key_variants() {
        let viewer = uid("660e8400-e29b-41d4-a716-446655440001");
        let anon = CacheKey::public_feed(15, None, None);
        let cursored = CacheKey::public_feed(15, Some("abc"), None);
        let viewed = CacheKey::public_feed(15, None, Some(viewer));

        assert_eq!(anon, "v1:feed:public:limit:15");
        assert_eq!(cursored, "v1:feed:public:limit:15:cursor:abc");
        assert_eq!(
            viewed,
            "v1:feed:public:limit:15:viewer:660e8400-e29b-41d4-a716-446655440001"
        );
        // Distinct request shapes must never collide on a key.
        assert_ne!(anon, cursored);
        assert_ne!(anon, viewed);
        assert_ne!(cursored, viewed);
    }

    #[test]
    fn test_keys_are_deterministic() {
        let user = uid("550e8400-e29b-41d4-a716-446655440000");
        assert_eq!(
            CacheKey::personalized_feed(user, 20, Some("c1")),
            CacheKey::personalized_feed(user, 20, Some("c1"))
        );
    }

    #[test]
    fn test_tags() {
        let user = uid("550e8400-e29b-41d4-a716-446655440000");
        assert_eq!(
            CacheKey::user_feed_tag(user),
            "v1:tag:feed:user:550e8400-e29b-41d4-a716-446655440000"
        );
        assert_eq!(CacheKey::public_feed_tag(), "v1:tag:feed:public");
    }
}
