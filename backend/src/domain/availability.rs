//! Doctor availability windows.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Identifier of a published availability window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvailabilityId(Uuid);

impl AvailabilityId {
    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Borrow the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for AvailabilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Raised when a window's bounds are not ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("availability end time {end} must be after start time {start}")]
pub struct WindowOrderError {
    /// Requested start.
    pub start: NaiveTime,
    /// Requested end, not after `start`.
    pub end: NaiveTime,
}

/// A contiguous block of time on one date during which a doctor accepts
/// bookings.
///
/// ## Invariants
/// - `start < end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WindowParts", into = "WindowParts")]
pub struct AvailabilityWindow {
    id: AvailabilityId,
    doctor_id: UserId,
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
}

impl AvailabilityWindow {
    /// Build a window, refusing empty or inverted intervals.
    pub fn new(
        id: AvailabilityId,
        doctor_id: UserId,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<Self, WindowOrderError> {
        if start >= end {
            return Err(WindowOrderError { start, end });
        }
        Ok(Self {
            id,
            doctor_id,
            date,
            start,
            end,
        })
    }

    /// Window identifier.
    #[must_use]
    pub const fn id(&self) -> AvailabilityId {
        self.id
    }

    /// Doctor who published the window.
    #[must_use]
    pub const fn doctor_id(&self) -> UserId {
        self.doctor_id
    }

    /// Date the window applies to.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// First bookable instant.
    #[must_use]
    pub const fn start(&self) -> NaiveTime {
        self.start
    }

    /// Exclusive upper bound.
    #[must_use]
    pub const fn end(&self) -> NaiveTime {
        self.end
    }

    /// Whether a booking at `time` on `date` falls inside this window.
    ///
    /// Both bounds are inclusive, so a start time equal to `end` is admitted
    /// even though no slot is derived for it.
    #[must_use]
    pub fn admits(&self, date: NaiveDate, time: NaiveTime) -> bool {
        self.date == date && self.start <= time && time <= self.end
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WindowParts {
    id: AvailabilityId,
    doctor_id: UserId,
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
}

impl TryFrom<WindowParts> for AvailabilityWindow {
    type Error = WindowOrderError;

    fn try_from(parts: WindowParts) -> Result<Self, Self::Error> {
        Self::new(parts.id, parts.doctor_id, parts.date, parts.start, parts.end)
    }
}

impl From<AvailabilityWindow> for WindowParts {
    fn from(window: AvailabilityWindow) -> Self {
        Self {
            id: window.id,
            doctor_id: window.doctor_id,
            date: window.date,
            start: window.start,
            end: window.end,
        }
    }
}
