//! Process-local schedule cache.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::ports::{CacheGeneration, ScheduleCache, ScheduleCacheError, ScheduleCacheKey};

/// Longest lifetime an entry gets when the configured TTL overflows the
/// monotonic clock.
const MAX_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 365);

struct Entry {
    expires_at: Instant,
    value: Value,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<String, Entry>,
    generations: HashMap<String, CacheGeneration>,
}

impl CacheState {
    fn generation(&self, key: &str) -> CacheGeneration {
        self.generations.get(key).copied().unwrap_or_default()
    }
}

/// Map-backed cache whose entries expire after a fixed TTL.
///
/// Entries and generations share one lock, so the generation check in
/// [`ScheduleCache::set`] and the insert cannot interleave with an
/// invalidation.
pub struct InMemoryScheduleCache {
    ttl: Duration,
    state: Mutex<CacheState>,
}

impl InMemoryScheduleCache {
    /// Create an empty cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            state: Mutex::new(CacheState::default()),
        }
    }

    fn poisoned() -> ScheduleCacheError {
        ScheduleCacheError::backend("in-memory cache lock poisoned")
    }

    fn expiry(&self, now: Instant) -> Instant {
        now.checked_add(self.ttl)
            .or_else(|| now.checked_add(MAX_TTL))
            .unwrap_or(now)
    }
}

#[async_trait]
impl ScheduleCache for InMemoryScheduleCache {
    async fn get(&self, key: &ScheduleCacheKey) -> Result<Option<Value>, ScheduleCacheError> {
        let mut state = self.state.lock().map_err(|_| Self::poisoned())?;
        let now = Instant::now();
        match state.entries.get(key.as_str()) {
            Some(entry) if entry.expires_at > now => Ok(Some(entry.value.clone())),
            Some(_) => {
                state.entries.remove(key.as_str());
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn generation(
        &self,
        key: &ScheduleCacheKey,
    ) -> Result<CacheGeneration, ScheduleCacheError> {
        let state = self.state.lock().map_err(|_| Self::poisoned())?;
        Ok(state.generation(key.as_str()))
    }

    async fn set(
        &self,
        key: &ScheduleCacheKey,
        value: Value,
        observed: CacheGeneration,
    ) -> Result<bool, ScheduleCacheError> {
        let mut state = self.state.lock().map_err(|_| Self::poisoned())?;
        if state.generation(key.as_str()) != observed {
            return Ok(false);
        }
        let expires_at = self.expiry(Instant::now());
        state
            .entries
            .insert(key.as_str().to_owned(), Entry { expires_at, value });
        Ok(true)
    }

    async fn invalidate(&self, key: &ScheduleCacheKey) -> Result<(), ScheduleCacheError> {
        let mut state = self.state.lock().map_err(|_| Self::poisoned())?;
        state.entries.remove(key.as_str());
        let next = state.generation(key.as_str()).next();
        state.generations.insert(key.as_str().to_owned(), next);
        Ok(())
    }
}
