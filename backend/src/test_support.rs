//! Test doubles shared by unit tests and the `tests/` suites.
//!
//! Compiled for `cfg(test)` and behind the `test-support` feature.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Local, NaiveDate, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{Account, Role, Specialization, UserId};

/// Clock whose current instant tests can move forward.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// Clock fixed at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Clock fixed at 08:00 UTC on `date`.
    pub fn at_morning_of(date: NaiveDate) -> Self {
        let now = date
            .and_hms_opt(8, 0, 0)
            .map(|naive| Utc.from_utc_datetime(&naive))
            .unwrap_or_else(|| panic!("08:00 exists on {date}"));
        Self::new(now)
    }

    /// Move the clock forward by whole days.
    pub fn advance_days(&self, days: i64) {
        *self.lock_clock() += TimeDelta::days(days);
    }

    /// Current UTC date.
    pub fn today(&self) -> NaiveDate {
        self.utc().date_naive()
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex poisoned"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// A client account with a random id.
pub fn client(name: &str) -> Account {
    account(name, Role::Client, None)
}

/// A doctor account with a random id and the given specialisation.
pub fn doctor(name: &str, specialization: &str) -> Account {
    let spec = Specialization::new(specialization)
        .unwrap_or_else(|err| panic!("fixture specialization {specialization:?}: {err}"));
    account(name, Role::Doctor, Some(spec))
}

/// An administrator account with a random id.
pub fn admin(name: &str) -> Account {
    account(name, Role::Admin, None)
}

fn account(name: &str, role: Role, specialization: Option<Specialization>) -> Account {
    Account {
        id: UserId::random(),
        name: name.to_owned(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        role,
        specialization,
    }
}
