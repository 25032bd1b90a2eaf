//! Schedule cache adapters.
//!
//! - [`InMemoryScheduleCache`]: per-process map with TTL, the default.
//! - [`RedisScheduleCache`]: shared cache over a `bb8-redis` pool, used when
//!   several replicas must see the same invalidations.

mod memory;
mod redis_cache;

pub use memory::InMemoryScheduleCache;
pub use redis_cache::{RedisCacheConfig, RedisScheduleCache};
