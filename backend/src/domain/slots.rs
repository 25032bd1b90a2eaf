//! Bookable slot derivation.
//!
//! A window yields candidate start times every [`SLOT_MINUTES`] minutes from
//! its start while the candidate is strictly before its end. Reserved start
//! times are then removed. Derivation is pure and
//! deterministic: the same windows and reservations always produce the same
//! [`SlotSet`].

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

use super::{AvailabilityWindow, Reservation};

/// Slot length in minutes.
pub const SLOT_MINUTES: i64 = 30;

/// Slot length as a duration.
#[must_use]
pub const fn slot_length() -> TimeDelta {
    TimeDelta::minutes(SLOT_MINUTES)
}

/// Free slot start times keyed by date.
///
/// Every date covered by a window or holding a reservation appears as a key,
/// even when it has no free slot left. Times under a date keep window order; windows on
/// the same date are concatenated in the order they were supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotSet(BTreeMap<NaiveDate, Vec<NaiveTime>>);

impl SlotSet {
    /// Free times on `date`, or `None` when the date is not indexed.
    #[must_use]
    pub fn on(&self, date: NaiveDate) -> Option<&[NaiveTime]> {
        self.0.get(&date).map(Vec::as_slice)
    }

    /// Whether `time` on `date` is still free.
    #[must_use]
    pub fn contains(&self, date: NaiveDate, time: NaiveTime) -> bool {
        self.on(date).is_some_and(|times| times.contains(&time))
    }

    /// Covered dates in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.0.keys().copied()
    }

    /// Iterate `(date, times)` pairs in date order.
    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &Vec<NaiveTime>)> {
        self.0.iter()
    }

    /// True when no date is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Candidate start times for one window, ignoring reservations.
#[must_use]
pub fn window_slots(window: &AvailabilityWindow) -> Vec<NaiveTime> {
    let step = slot_length();
    let mut slots = Vec::new();
    let mut cursor = window.start();
    while cursor < window.end() {
        slots.push(cursor);
        let (next, wrapped) = cursor.overflowing_add_signed(step);
        if wrapped != 0 {
            break;
        }
        cursor = next;
    }
    slots
}

/// Derive free slots from `windows` minus `reservations`, keeping only dates
/// on or after `from`.
///
/// Callers pass the windows and reservations of a single doctor.
#[must_use]
pub fn derive_slot_set(
    windows: &[AvailabilityWindow],
    reservations: &[Reservation],
    from: NaiveDate,
) -> SlotSet {
    let mut slots: BTreeMap<NaiveDate, Vec<NaiveTime>> = BTreeMap::new();
    for window in windows.iter().filter(|w| w.date() >= from) {
        slots
            .entry(window.date())
            .or_default()
            .extend(window_slots(window));
    }
    for reservation in reservations.iter().filter(|r| r.date >= from) {
        slots
            .entry(reservation.date)
            .or_default()
            .retain(|time| *time != reservation.time);
    }
    SlotSet(slots)
}

/// Reserved start times keyed by date, ascending, on or after `from`.
#[must_use]
pub fn reserved_times(
    reservations: &[Reservation],
    from: NaiveDate,
) -> BTreeMap<NaiveDate, Vec<NaiveTime>> {
    let mut reserved: BTreeMap<NaiveDate, Vec<NaiveTime>> = BTreeMap::new();
    for reservation in reservations.iter().filter(|r| r.date >= from) {
        reserved.entry(reservation.date).or_default().push(reservation.time);
    }
    for times in reserved.values_mut() {
        times.sort_unstable();
    }
    reserved
}

#[cfg(test)]
#[path = "slots_tests.rs"]
mod tests;
