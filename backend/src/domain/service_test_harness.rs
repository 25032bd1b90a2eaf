//! Mock-backed port bundle for service unit tests.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};

use crate::domain::BookingPorts;
use crate::domain::ports::{
    CacheGeneration, MockAccountRepository, MockAvailabilityRepository, MockDoctorRevocationRepository,
    MockNotificationDispatcher, MockReservationRepository, MockScheduleCache,
};
use crate::test_support::MutableClock;

pub(crate) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 6, 10).expect("valid date")
}

pub(crate) fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).expect("valid time")
}

pub(crate) fn days_from_today(days: u64) -> NaiveDate {
    today()
        .checked_add_days(chrono::Days::new(days))
        .expect("date in range")
}

/// Mocks for every driven port. Tests set expectations, then call
/// [`PortMocks::into_ports`].
pub(crate) struct PortMocks {
    pub accounts: MockAccountRepository,
    pub availability: MockAvailabilityRepository,
    pub reservations: MockReservationRepository,
    pub revocations: MockDoctorRevocationRepository,
    pub cache: MockScheduleCache,
    pub notifier: MockNotificationDispatcher,
}

impl PortMocks {
    pub(crate) fn new() -> Self {
        Self {
            accounts: MockAccountRepository::new(),
            availability: MockAvailabilityRepository::new(),
            reservations: MockReservationRepository::new(),
            revocations: MockDoctorRevocationRepository::new(),
            cache: MockScheduleCache::new(),
            notifier: MockNotificationDispatcher::new(),
        }
    }

    /// Accept any number of cache invalidations.
    pub(crate) fn allow_invalidation(&mut self) {
        self.cache.expect_invalidate().returning(|_| Ok(()));
    }

    /// Treat every read as a miss and accept writes.
    pub(crate) fn cold_cache(&mut self) {
        self.cache.expect_get().returning(|_| Ok(None));
        self.cache
            .expect_generation()
            .returning(|_| Ok(CacheGeneration::default()));
        self.cache.expect_set().returning(|_, _, _| Ok(true));
    }

    pub(crate) fn into_ports(self) -> BookingPorts {
        BookingPorts {
            accounts: Arc::new(self.accounts),
            availability: Arc::new(self.availability),
            reservations: Arc::new(self.reservations),
            revocations: Arc::new(self.revocations),
            cache: Arc::new(self.cache),
            notifier: Arc::new(self.notifier),
            clock: Arc::new(MutableClock::at_morning_of(today())),
        }
    }
}
