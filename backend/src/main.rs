//! Booking server entry-point.

mod server;

use std::net::SocketAddr;

use actix_web::web;
use color_eyre::eyre::{WrapErr, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use medbook::inbound::http::health::HealthState;
use medbook::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use medbook::settings::AppSettings;

use server::{ServerConfig, create_server};

async fn server_config(settings: &AppSettings) -> color_eyre::Result<ServerConfig> {
    let bind_addr: SocketAddr = settings
        .bind_addr()
        .parse()
        .wrap_err_with(|| format!("invalid bind address {}", settings.bind_addr()))?;
    let mut config = ServerConfig::new(bind_addr)
        .with_cache_ttl(settings.cache_ttl())
        .with_demo_data(settings.seed_demo_data);

    if let Some(url) = settings.database_url.as_deref() {
        if settings.run_migrations {
            let applied = run_pending_migrations(url)
                .await
                .wrap_err("database migrations failed")?;
            info!(applied, "database schema up to date");
        }
        let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.db_pool_size))
            .await
            .wrap_err("database pool failed to start")?;
        config = config.with_db_pool(pool);
    } else {
        warn!("no database configured; bookings are kept in memory only");
    }

    if let Some(url) = settings.redis_url.as_deref() {
        config = config.with_redis_url(url);
    }
    Ok(config)
}

#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(err) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %err, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|err| eyre!("failed to load configuration: {err}"))?;
    let config = server_config(&settings).await?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)
        .await
        .wrap_err("failed to start server")?;
    let outcome = server.await;
    health_state.mark_unhealthy();
    outcome.wrap_err("server terminated with an error")
}
