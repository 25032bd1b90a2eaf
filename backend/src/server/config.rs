//! HTTP server configuration object.

use std::net::SocketAddr;
use std::time::Duration;

use medbook::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) redis_url: Option<String>,
    pub(crate) cache_ttl: Duration,
    pub(crate) seed_demo_data: bool,
}

impl ServerConfig {
    /// In-memory stores and cache, ten minute cache TTL, no demo data.
    #[must_use]
    pub const fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            redis_url: None,
            cache_ttl: Duration::from_secs(600),
            seed_demo_data: false,
        }
    }

    /// Use PostgreSQL for accounts, schedules and the notification inbox.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Share schedule views through Redis instead of the process cache.
    #[must_use]
    pub fn with_redis_url(mut self, url: impl Into<String>) -> Self {
        self.redis_url = Some(url.into());
        self
    }

    /// Override the schedule cache lifetime.
    #[must_use]
    pub const fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Provision the demo accounts. Ignored when a database is configured.
    #[must_use]
    pub const fn with_demo_data(mut self, enabled: bool) -> Self {
        self.seed_demo_data = enabled;
        self
    }

    /// Address the server listens on.
    #[must_use]
    pub const fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
