//! Reservations and booking requests.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Identifier of a confirmed reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(Uuid);

impl ReservationId {
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

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A client's attempt to book one slot with one doctor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    /// Doctor to book with.
    pub doctor_id: UserId,
    /// Client making the booking.
    pub client_id: UserId,
    /// Requested date.
    pub date: NaiveDate,
    /// Requested slot start.
    pub time: NaiveTime,
}

/// A confirmed booking.
///
/// At most one reservation exists per `(doctor_id, date, time)` and per
/// `(doctor_id, client_id, date)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    /// Reservation identifier.
    pub id: ReservationId,
    /// Booked doctor.
    pub doctor_id: UserId,
    /// Client holding the slot.
    pub client_id: UserId,
    /// Date of the appointment.
    pub date: NaiveDate,
    /// Start of the half-hour slot.
    pub time: NaiveTime,
    /// When the booking was confirmed.
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    /// Confirm a request under a fresh identifier.
    #[must_use]
    pub fn confirm(request: BookingRequest, created_at: DateTime<Utc>) -> Self {
        let BookingRequest {
            doctor_id,
            client_id,
            date,
            time,
        } = request;
        Self {
            id: ReservationId::random(),
            doctor_id,
            client_id,
            date,
            time,
            created_at,
        }
    }

    /// Whether this reservation holds the doctor's slot at `date`/`time`.
    #[must_use]
    pub fn occupies(&self, doctor_id: UserId, date: NaiveDate, time: NaiveTime) -> bool {
        self.doctor_id == doctor_id && self.date == date && self.time == time
    }

    /// Whether `client_id` already holds a booking with the doctor on `date`.
    #[must_use]
    pub fn books_client_on(&self, doctor_id: UserId, client_id: UserId, date: NaiveDate) -> bool {
        self.doctor_id == doctor_id && self.client_id == client_id && self.date == date
    }
}
