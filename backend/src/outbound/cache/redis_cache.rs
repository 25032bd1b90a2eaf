//! Redis-backed schedule cache.
//!
//! Keys are namespaced as `schedule:v1:<key>` so a payload format change can
//! bump the version instead of flushing. Each write gets the base TTL plus a
//! random jitter to spread expiries of views written together.
//!
//! Generations live beside the views as `schedule:v1:gen:<key>` counters
//! without expiry. Invalidation bumps the counter and deletes the view in one
//! `MULTI`; writes go through a Lua script that compares the counter before
//! `SET`, so the check and the write are atomic on the server.

use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::RedisConnectionManager;
use bb8_redis::bb8::{Pool, RunError};
use bb8_redis::redis::{self, RedisError};
use rand::Rng;
use serde_json::Value;
use tracing::debug;

use crate::domain::ports::{CacheGeneration, ScheduleCache, ScheduleCacheError, ScheduleCacheKey};

const NAMESPACE: &str = "schedule:v1:";
const GENERATION_NAMESPACE: &str = "schedule:v1:gen:";

/// `KEYS[1]` view, `KEYS[2]` generation; `ARGV` observed generation, payload,
/// expiry seconds. Returns 1 when stored.
const CONDITIONAL_SET: &str = r"
if (redis.call('GET', KEYS[2]) or '0') == ARGV[1] then
    redis.call('SET', KEYS[1], ARGV[2], 'EX', ARGV[3])
    return 1
end
return 0
";

/// Connection and expiry settings for [`RedisScheduleCache`].
#[derive(Debug, Clone)]
pub struct RedisCacheConfig {
    /// `redis://` connection URL.
    pub url: String,
    /// Base lifetime of a cached view.
    pub ttl: Duration,
    /// Upper bound of the random extra TTL added to each write.
    pub jitter: Duration,
    /// Pool size.
    pub max_connections: u32,
}

/// Schedule cache stored in Redis.
#[derive(Clone)]
pub struct RedisScheduleCache {
    pool: Pool<RedisConnectionManager>,
    ttl: Duration,
    jitter: Duration,
}

fn backend_error(err: impl std::fmt::Display) -> ScheduleCacheError {
    ScheduleCacheError::backend(err.to_string())
}

fn pool_error(err: RunError<RedisError>) -> ScheduleCacheError {
    match err {
        RunError::User(inner) => backend_error(inner),
        RunError::TimedOut => ScheduleCacheError::backend("timed out waiting for a redis connection"),
    }
}

impl RedisScheduleCache {
    /// Open a connection pool against `config.url`.
    pub async fn connect(config: RedisCacheConfig) -> Result<Self, ScheduleCacheError> {
        let manager = RedisConnectionManager::new(config.url.as_str()).map_err(backend_error)?;
        let pool = Pool::builder()
            .max_size(config.max_connections)
            .build(manager)
            .await
            .map_err(backend_error)?;
        Ok(Self {
            pool,
            ttl: config.ttl,
            jitter: config.jitter,
        })
    }

    fn namespaced(key: &ScheduleCacheKey) -> String {
        format!("{NAMESPACE}{key}")
    }

    fn generation_key(key: &ScheduleCacheKey) -> String {
        format!("{GENERATION_NAMESPACE}{key}")
    }

    fn expiry_seconds(&self) -> u64 {
        let jitter_cap = self.jitter.as_secs();
        let jitter = if jitter_cap == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..=jitter_cap)
        };
        self.ttl.as_secs().saturating_add(jitter).max(1)
    }
}

#[async_trait]
impl ScheduleCache for RedisScheduleCache {
    async fn get(&self, key: &ScheduleCacheKey) -> Result<Option<Value>, ScheduleCacheError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let raw: Option<String> = redis::cmd("GET")
            .arg(Self::namespaced(key))
            .query_async(&mut *conn)
            .await
            .map_err(backend_error)?;
        raw.map(|payload| {
            serde_json::from_str(&payload)
                .map_err(|err| ScheduleCacheError::serialization(err.to_string()))
        })
        .transpose()
    }

    async fn generation(
        &self,
        key: &ScheduleCacheKey,
    ) -> Result<CacheGeneration, ScheduleCacheError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let raw: Option<u64> = redis::cmd("GET")
            .arg(Self::generation_key(key))
            .query_async(&mut *conn)
            .await
            .map_err(backend_error)?;
        Ok(CacheGeneration::new(raw.unwrap_or_default()))
    }

    async fn set(
        &self,
        key: &ScheduleCacheKey,
        value: Value,
        observed: CacheGeneration,
    ) -> Result<bool, ScheduleCacheError> {
        let payload = serde_json::to_string(&value)
            .map_err(|err| ScheduleCacheError::serialization(err.to_string()))?;
        let seconds = self.expiry_seconds();
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let stored: i64 = redis::cmd("EVAL")
            .arg(CONDITIONAL_SET)
            .arg(2)
            .arg(Self::namespaced(key))
            .arg(Self::generation_key(key))
            .arg(observed.get())
            .arg(payload)
            .arg(seconds)
            .query_async(&mut *conn)
            .await
            .map_err(backend_error)?;
        debug!(
            key = %key,
            ttl_secs = seconds,
            generation = observed.get(),
            stored = stored == 1,
            "schedule view write"
        );
        Ok(stored == 1)
    }

    async fn invalidate(&self, key: &ScheduleCacheKey) -> Result<(), ScheduleCacheError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        redis::pipe()
            .atomic()
            .cmd("INCR")
            .arg(Self::generation_key(key))
            .ignore()
            .cmd("DEL")
            .arg(Self::namespaced(key))
            .ignore()
            .query_async::<()>(&mut *conn)
            .await
            .map_err(backend_error)?;
        Ok(())
    }
}
