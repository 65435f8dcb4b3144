//! Redis cache for the requirements stage, keyed by job description.
//!
//! Every error degrades to a cache miss: the cache never fails a screening.

use redis::{AsyncCommands, RedisResult};
use tracing::{debug, warn};
use uuid::Uuid;

const KEY_PREFIX: &str = "screener:requirements";

#[derive(Clone)]
pub struct RequirementsCache {
    client: redis::Client,
    ttl_secs: u64,
}

impl RequirementsCache {
    pub fn new(client: redis::Client, ttl_secs: u64) -> Self {
        Self { client, ttl_secs }
    }

    /// Deterministic key: UUIDv5 of the trimmed job description.
    pub fn cache_key(jd_text: &str) -> String {
        let digest = Uuid::new_v5(&Uuid::NAMESPACE_OID, jd_text.trim().as_bytes());
        format!("{KEY_PREFIX}:{digest}")
    }

    pub async fn get(&self, jd_text: &str) -> Option<String> {
        let key = Self::cache_key(jd_text);
        match self.fetch(&key).await {
            Ok(hit) => {
                let outcome = if hit.is_some() { "hit" } else { "miss" };
                debug!("Requirements cache {outcome} for {key}");
                hit
            }
            Err(e) => {
                warn!("Requirements cache read failed, treating as miss: {e}");
                None
            }
        }
    }

    pub async fn put(&self, jd_text: &str, requirements: &str) {
        let key = Self::cache_key(jd_text);
        if let Err(e) = self.store(&key, requirements).await {
            warn!("Requirements cache write failed: {e}");
        }
    }

    async fn fetch(&self, key: &str) -> RedisResult<Option<String>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.get(key).await
    }

    async fn store(&self, key: &str, value: &str) -> RedisResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set_ex(key, value, self.ttl_secs).await
    }
}
