//! Port for caching derived schedule views.
//!
//! Each doctor has two cached views, the availability listing and the
//! calendar. Any write that touches a doctor's windows or reservations must
//! invalidate both before the write is acknowledged.
//!
//! Every key carries a [`CacheGeneration`] that invalidation bumps. Readers
//! note the generation before loading rows and hand it back on
//! [`ScheduleCache::set`]; the adapter refuses the write if an invalidation
//! landed in between, so a view built from pre-write rows is never cached
//! after the write that made it stale.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::UserId;

use super::define_port_error;

/// Which derived view of a doctor's schedule a cache entry holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScheduleView {
    /// The doctor's own window listing.
    Availabilities,
    /// Free slots plus reserved times.
    Calendar,
}

impl ScheduleView {
    /// Every view, for bulk invalidation.
    pub const ALL: [Self; 2] = [Self::Availabilities, Self::Calendar];

    /// Label used as the key suffix.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Availabilities => "availabilities",
            Self::Calendar => "calendar",
        }
    }
}

/// Cache key of the form `doctor_{id}_{view}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScheduleCacheKey(String);

impl ScheduleCacheKey {
    /// Key for one view of the doctor's schedule.
    #[must_use]
    pub fn new(doctor_id: &UserId, view: ScheduleView) -> Self {
        Self(format!("doctor_{doctor_id}_{}", view.as_str()))
    }

    /// Keys of every view held for the doctor.
    #[must_use]
    pub fn all_for(doctor_id: &UserId) -> [Self; 2] {
        ScheduleView::ALL.map(|view| Self::new(doctor_id, view))
    }

    /// The key as stored by adapters.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Invalidation counter of one cache key. Starts at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CacheGeneration(u64);

impl CacheGeneration {
    /// Wrap a raw counter value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// The raw counter value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The generation after one more invalidation.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for ScheduleCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

define_port_error! {
    /// Errors surfaced by schedule cache adapters.
    pub enum ScheduleCacheError {
        /// The cache backend is unavailable or timing out.
        Backend { message: String } => "schedule cache backend failure: {message}",
        /// A cached payload could not be encoded or decoded.
        Serialization { message: String } => "schedule cache serialisation failed: {message}",
    }
}

/// Key/value cache for derived schedule views.
///
/// Values are JSON so adapters stay independent of the view types.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScheduleCache: Send + Sync {
    /// Read a cached view. Expired entries read as `None`.
    async fn get(&self, key: &ScheduleCacheKey) -> Result<Option<Value>, ScheduleCacheError>;

    /// Current generation of `key`.
    async fn generation(
        &self,
        key: &ScheduleCacheKey,
    ) -> Result<CacheGeneration, ScheduleCacheError>;

    /// Store a view under the adapter's configured time-to-live, provided
    /// `key` is still at the `observed` generation.
    ///
    /// Returns `false`, storing nothing, when an invalidation happened since.
    async fn set(
        &self,
        key: &ScheduleCacheKey,
        value: Value,
        observed: CacheGeneration,
    ) -> Result<bool, ScheduleCacheError>;

    /// Drop a cached view and advance its generation. Missing keys are not
    /// an error.
    async fn invalidate(&self, key: &ScheduleCacheKey) -> Result<(), ScheduleCacheError>;
}
