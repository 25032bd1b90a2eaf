//! Builders selecting the adapters behind each driven port.

use std::sync::Arc;
use std::time::Duration;

use medbook::domain::BookingPorts;
use medbook::domain::ports::{
    AccountRepository, AvailabilityRepository, DoctorRevocationRepository, NotificationDispatcher,
    ReservationRepository, ScheduleCache,
};
use medbook::outbound::cache::{InMemoryScheduleCache, RedisCacheConfig, RedisScheduleCache};
use medbook::outbound::memory::{InMemoryBookingStore, demo_accounts};
use medbook::outbound::notifications::{FanOutNotificationDispatcher, TracingNotificationDispatcher};
use medbook::outbound::persistence::{
    DieselAccountRepository, DieselAvailabilityRepository, DieselDoctorRevocationRepository,
    DieselNotificationInbox, DieselReservationRepository,
};
use mockable::DefaultClock;
use tracing::info;

use super::ServerConfig;

const REDIS_MAX_CONNECTIONS: u32 = 16;
const REDIS_TTL_JITTER: Duration = Duration::from_secs(30);

struct Stores {
    accounts: Arc<dyn AccountRepository>,
    availability: Arc<dyn AvailabilityRepository>,
    reservations: Arc<dyn ReservationRepository>,
    revocations: Arc<dyn DoctorRevocationRepository>,
    notifier: Arc<dyn NotificationDispatcher>,
}

fn build_stores(config: &ServerConfig) -> Stores {
    match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL booking store");
            let notifier = FanOutNotificationDispatcher::default()
                .with(Arc::new(DieselNotificationInbox::new(pool.clone())))
                .with(Arc::new(TracingNotificationDispatcher));
            Stores {
                accounts: Arc::new(DieselAccountRepository::new(pool.clone())),
                availability: Arc::new(DieselAvailabilityRepository::new(pool.clone())),
                reservations: Arc::new(DieselReservationRepository::new(pool.clone())),
                revocations: Arc::new(DieselDoctorRevocationRepository::new(pool.clone())),
                notifier: Arc::new(notifier),
            }
        }
        None => {
            let store = Arc::new(if config.seed_demo_data {
                InMemoryBookingStore::with_accounts(demo_accounts())
            } else {
                InMemoryBookingStore::new()
            });
            info!(demo_data = config.seed_demo_data, "using in-memory booking store");
            Stores {
                accounts: store.clone(),
                availability: store.clone(),
                reservations: store.clone(),
                revocations: store,
                notifier: Arc::new(TracingNotificationDispatcher),
            }
        }
    }
}

async fn build_cache(config: &ServerConfig) -> std::io::Result<Arc<dyn ScheduleCache>> {
    match &config.redis_url {
        Some(url) => {
            let cache = RedisScheduleCache::connect(RedisCacheConfig {
                url: url.clone(),
                ttl: config.cache_ttl,
                jitter: REDIS_TTL_JITTER,
                max_connections: REDIS_MAX_CONNECTIONS,
            })
            .await
            .map_err(|err| std::io::Error::other(format!("redis cache: {err}")))?;
            info!("using Redis schedule cache");
            Ok(Arc::new(cache))
        }
        None => Ok(Arc::new(InMemoryScheduleCache::new(config.cache_ttl))),
    }
}

/// Assemble the driven ports for the booking services.
///
/// # Errors
/// Fails when the Redis cache cannot be reached.
pub(crate) async fn build_booking_ports(config: &ServerConfig) -> std::io::Result<BookingPorts> {
    let stores = build_stores(config);
    let cache = build_cache(config).await?;
    Ok(BookingPorts {
        accounts: stores.accounts,
        availability: stores.availability,
        reservations: stores.reservations,
        revocations: stores.revocations,
        cache,
        notifier: stores.notifier,
        clock: Arc::new(DefaultClock),
    })
}
