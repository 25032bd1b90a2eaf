//! Async PostgreSQL connection pool.
//!
//! Wraps a `diesel-async` connection manager in a `bb8` pool. Checkout
//! honours the configured timeout; failures surface as [`PoolError`] so each
//! repository can translate them into its own connection error.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};

/// Pool construction or checkout failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// The pool could not be constructed.
    #[error("failed to build connection pool: {message}")]
    Build {
        /// Underlying failure description.
        message: String,
    },
    /// No connection became available.
    #[error("failed to get connection from pool: {message}")]
    Checkout {
        /// Underlying failure description.
        message: String,
    },
}

impl PoolError {
    /// The underlying message, whichever stage failed.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Build { message } | Self::Checkout { message } => message,
        }
    }
}

/// Pool sizing and timeouts.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    min_idle: Option<u32>,
    connection_timeout: Duration,
}

impl PoolConfig {
    /// Defaults: ten connections, two kept idle, thirty second checkout.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: 10,
            min_idle: Some(2),
            connection_timeout: Duration::from_secs(30),
        }
    }

    /// Cap the number of pooled connections. Values below one become one.
    #[must_use]
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size.max(1);
        self.min_idle = self.min_idle.map(|idle| idle.min(self.max_size));
        self
    }

    /// Bound how long checkout waits for a connection.
    #[must_use]
    pub const fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Connection URL.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}

/// Shared handle to the connection pool.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Build the pool, opening the initial idle connections.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(config.database_url);
        let inner = Pool::builder()
            .max_size(config.max_size)
            .min_idle(config.min_idle)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .await
            .map_err(|err| PoolError::Build {
                message: err.to_string(),
            })?;
        Ok(Self { inner })
    }

    /// Check out a connection.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner.get().await.map_err(|err| PoolError::Checkout {
            message: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn defaults() {
        let config = PoolConfig::new("postgres://localhost/medbook");
        assert_eq!(config.database_url(), "postgres://localhost/medbook");
        assert_eq!(config.max_size, 10);
        assert_eq!(config.min_idle, Some(2));
    }

    #[rstest]
    #[case(0, 1, Some(1))]
    #[case(1, 1, Some(1))]
    #[case(20, 20, Some(2))]
    fn max_size_clamps_idle(#[case] requested: u32, #[case] max: u32, #[case] idle: Option<u32>) {
        let config = PoolConfig::new("postgres://localhost/medbook").with_max_size(requested);
        assert_eq!(config.max_size, max);
        assert_eq!(config.min_idle, idle);
    }

    #[rstest]
    fn error_message_is_stage_agnostic() {
        let err = PoolError::Checkout {
            message: "refused".into(),
        };
        assert_eq!(err.message(), "refused");
        assert!(err.to_string().contains("get connection"));
    }
}
