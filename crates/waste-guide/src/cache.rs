/// Redis caching for recycling-center lookups.
///
/// Key schema (namespaced to avoid collisions):
/// - `wgd:v1:centers:{sha256(address|radius|keyword)}` — JSON-serialized
///   `FindCentersResponse` holding the full, untruncated place list
///   (TTL: 3600s)
///
/// Everything degrades gracefully: a Redis failure is a cache miss and the
/// caller re-queries the provider.
use sha2::{Digest, Sha256};
use tracing::warn;

use waste_common::mcp_api::FindCentersResponse;
use waste_common::redis::RedisCache;

const KEY_PREFIX: &str = "wgd:v1:";
const CENTERS_TTL_SECS: u64 = 3600;

pub struct CenterCache {
    redis: RedisCache,
}

impl CenterCache {
    pub fn new(redis: RedisCache) -> Self {
        Self { redis }
    }

    pub async fn get_centers(
        &self,
        address: &str,
        radius_meters: u32,
        keyword: &str,
    ) -> Option<FindCentersResponse> {
        let key = centers_key(address, radius_meters, keyword);
        let json = self.redis.get(&key).await?;
        serde_json::from_str(&json)
            .inspect_err(|e| warn!(error = %e, key, "cache deserialization failed"))
            .ok()
    }

    pub async fn set_centers(
        &self,
        address: &str,
        radius_meters: u32,
        keyword: &str,
        response: &FindCentersResponse,
    ) {
        let key = centers_key(address, radius_meters, keyword);
        if let Ok(json) = serde_json::to_string(response) {
            self.redis.set_with_ttl(&key, &json, CENTERS_TTL_SECS).await;
        }
    }
}

/// Deterministic cache key over the full query shape.
fn centers_key(address: &str, radius_meters: u32, keyword: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(address.as_bytes());
    hasher.update(b"|");
    hasher.update(radius_meters.to_string().as_bytes());
    hasher.update(b"|");
    hasher.update(keyword.as_bytes());
    let hash = hasher.finalize();
    format!("{KEY_PREFIX}centers:{:x}", hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_keys_are_deterministic_and_query_shaped() {
        let a = centers_key("Colombo", 5000, "recycling center");
        let b = centers_key("Colombo", 5000, "recycling center");
        assert_eq!(a, b);
        assert!(a.starts_with("wgd:v1:centers:"));

        assert_ne!(a, centers_key("Kandy", 5000, "recycling center"));
        assert_ne!(a, centers_key("Colombo", 2500, "recycling center"));
        assert_ne!(a, centers_key("Colombo", 5000, "scrap yard"));
    }
}
