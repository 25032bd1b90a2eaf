//! Port for reservation persistence.
//!
//! Adapters must enforce both uniqueness rules atomically with the insert:
//! one reservation per doctor slot, and one reservation per client, doctor
//! and day. The service's admission pre-check is only a fast path; concurrent
//! requests are settled here.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{Reservation, ReservationId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by reservation repository adapters.
    pub enum ReservationRepositoryError {
        /// The backing store could not be reached.
        Connection { message: String } =>
            "reservation repository connection failed: {message}",
        /// A query or mutation failed.
        Query { message: String } =>
            "reservation repository query failed: {message}",
        /// The doctor's slot is already held.
        SlotConflict => "reservation slot already taken",
        /// The client already holds a booking with the doctor on that day.
        DuplicateClientBooking => "client already booked this doctor on that day",
    }
}

/// Storage for confirmed reservations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Insert a reservation, failing with
    /// [`ReservationRepositoryError::SlotConflict`] or
    /// [`ReservationRepositoryError::DuplicateClientBooking`] on a clash.
    async fn insert(&self, reservation: &Reservation) -> Result<(), ReservationRepositoryError>;

    /// Fetch a reservation by id.
    async fn find_by_id(
        &self,
        id: &ReservationId,
    ) -> Result<Option<Reservation>, ReservationRepositoryError>;

    /// Delete one reservation. Returns `false` when it did not exist.
    async fn delete(&self, id: &ReservationId) -> Result<bool, ReservationRepositoryError>;

    /// The doctor's reservations dated `from` or later, ordered by date then
    /// time.
    async fn list_for_doctor(
        &self,
        doctor_id: &UserId,
        from: NaiveDate,
    ) -> Result<Vec<Reservation>, ReservationRepositoryError>;

    /// The doctor's reservations on exactly `date`.
    async fn list_for_doctor_on(
        &self,
        doctor_id: &UserId,
        date: NaiveDate,
    ) -> Result<Vec<Reservation>, ReservationRepositoryError>;

    /// Every reservation held by the client, ordered by date then time.
    async fn list_for_client(
        &self,
        client_id: &UserId,
    ) -> Result<Vec<Reservation>, ReservationRepositoryError>;
}
