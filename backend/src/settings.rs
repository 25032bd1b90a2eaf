//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `MEDBOOK_*` environment variables and an
//! optional configuration file, in that order of precedence.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Runtime configuration for the booking server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MEDBOOK")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string. Without it the in-memory store is used.
    pub database_url: Option<String>,
    /// Redis connection string. Without it schedules are cached in-process.
    pub redis_url: Option<String>,
    /// Lifetime of cached schedule views.
    #[ortho_config(default = 600)]
    pub cache_ttl_secs: u64,
    /// Maximum pooled database connections.
    #[ortho_config(default = 10)]
    pub db_pool_size: u32,
    /// Apply embedded migrations before serving.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
    /// Provision demo accounts into the in-memory store.
    #[ortho_config(default = true)]
    pub seed_demo_data: bool,
}

impl AppSettings {
    /// Configured bind address, falling back to all interfaces on 8080.
    pub fn bind_addr(&self) -> &str {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// Schedule cache lifetime.
    pub const fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    const VARS: [&str; 7] = [
        "MEDBOOK_BIND_ADDR",
        "MEDBOOK_DATABASE_URL",
        "MEDBOOK_REDIS_URL",
        "MEDBOOK_CACHE_TTL_SECS",
        "MEDBOOK_DB_POOL_SIZE",
        "MEDBOOK_RUN_MIGRATIONS",
        "MEDBOOK_SEED_DEMO_DATA",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("medbook")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), DEFAULT_BIND_ADDR);
        assert!(settings.database_url.is_none());
        assert!(settings.redis_url.is_none());
        assert_eq!(settings.cache_ttl(), Duration::from_secs(600));
        assert_eq!(settings.db_pool_size, 10);
        assert!(settings.run_migrations);
        assert!(settings.seed_demo_data);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("MEDBOOK_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "MEDBOOK_DATABASE_URL",
                Some("postgres://localhost/medbook".to_owned()),
            ),
            ("MEDBOOK_REDIS_URL", Some("redis://localhost".to_owned())),
            ("MEDBOOK_CACHE_TTL_SECS", Some("30".to_owned())),
            ("MEDBOOK_DB_POOL_SIZE", Some("4".to_owned())),
            ("MEDBOOK_RUN_MIGRATIONS", Some("false".to_owned())),
            ("MEDBOOK_SEED_DEMO_DATA", Some("false".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), "127.0.0.1:9000");
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://localhost/medbook")
        );
        assert_eq!(settings.redis_url.as_deref(), Some("redis://localhost"));
        assert_eq!(settings.cache_ttl(), Duration::from_secs(30));
        assert_eq!(settings.db_pool_size, 4);
        assert!(!settings.run_migrations);
        assert!(!settings.seed_demo_data);
    }
}
