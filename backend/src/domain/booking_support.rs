//! Shared wiring and helpers for the booking services.

use std::sync::Arc;

use chrono::NaiveDate;
use mockable::Clock;
use tracing::{error, warn};

use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, AvailabilityRepository,
    AvailabilityRepositoryError, DoctorRevocationError, DoctorRevocationRepository,
    NotificationDispatcher, ReservationRepository, ReservationRepositoryError, ScheduleCache,
    ScheduleCacheKey,
};
use crate::domain::{Account, BookingResult, Error, Notification, Rejection, UserId};

/// Driven ports shared by every booking service.
#[derive(Clone)]
pub struct BookingPorts {
    /// Account lookup and role changes.
    pub accounts: Arc<dyn AccountRepository>,
    /// Availability window storage.
    pub availability: Arc<dyn AvailabilityRepository>,
    /// Reservation storage with the uniqueness guarantees.
    pub reservations: Arc<dyn ReservationRepository>,
    /// Atomic doctor revocation cascade.
    pub revocations: Arc<dyn DoctorRevocationRepository>,
    /// Cache for derived schedule views.
    pub cache: Arc<dyn ScheduleCache>,
    /// Outbound notification channel.
    pub notifier: Arc<dyn NotificationDispatcher>,
    /// Source of "today".
    pub clock: Arc<dyn Clock + Send + Sync>,
}

impl BookingPorts {
    /// Today's date in UTC.
    pub(crate) fn today(&self) -> NaiveDate {
        self.clock.utc().date_naive()
    }

    /// Load an account, refusing with `NOT_FOUND` when it does not exist.
    pub(crate) async fn require_account(&self, id: &UserId, label: &str) -> BookingResult<Account> {
        self.accounts
            .find_by_id(id)
            .await
            .map_err(map_account_error)?
            .ok_or_else(|| Rejection::not_found(format!("{label} not found.")).into())
    }

    /// Drop both cached views of the doctor's schedule.
    ///
    /// Failures are logged; the entries still expire with their TTL.
    pub(crate) async fn invalidate_schedule(&self, doctor_id: &UserId) {
        for key in ScheduleCacheKey::all_for(doctor_id) {
            if let Err(err) = self.cache.invalidate(&key).await {
                error!(
                    key = %key,
                    kind = err.kind(),
                    error = %err,
                    "schedule cache invalidation failed"
                );
            }
        }
    }

    /// Deliver notifications, logging rather than propagating failures.
    pub(crate) async fn notify_all(&self, notifications: impl IntoIterator<Item = Notification>) {
        for notification in notifications {
            if let Err(err) = self.notifier.dispatch(&notification).await {
                warn!(
                    recipient = %notification.recipient,
                    event = notification.event.kind(),
                    error = %err,
                    "notification dispatch failed"
                );
            }
        }
    }
}

pub(crate) fn map_account_error(error: AccountRepositoryError) -> Error {
    match error {
        AccountRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("account repository unavailable: {message}"))
        }
        AccountRepositoryError::Query { message } => {
            Error::internal(format!("account repository error: {message}"))
        }
        AccountRepositoryError::Corrupt { message } => {
            Error::internal(format!("stored account is invalid: {message}"))
        }
    }
}

pub(crate) fn map_availability_error(error: AvailabilityRepositoryError) -> Error {
    match error {
        AvailabilityRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("availability repository unavailable: {message}"))
        }
        AvailabilityRepositoryError::Query { message } => {
            Error::internal(format!("availability repository error: {message}"))
        }
    }
}

pub(crate) fn map_revocation_error(error: DoctorRevocationError) -> Error {
    match error {
        DoctorRevocationError::Connection { message } => {
            Error::service_unavailable(format!("revocation store unavailable: {message}"))
        }
        DoctorRevocationError::Query { message } => {
            Error::internal(format!("doctor revocation failed: {message}"))
        }
    }
}

/// Map reservation store failures, turning uniqueness clashes into the
/// matching rule refusal.
pub(crate) fn map_reservation_error(error: ReservationRepositoryError) -> crate::domain::BookingError {
    match error {
        ReservationRepositoryError::SlotConflict => Rejection::slot_taken().into(),
        ReservationRepositoryError::DuplicateClientBooking => {
            Rejection::duplicate_by_client().into()
        }
        ReservationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("reservation repository unavailable: {message}"))
                .into()
        }
        ReservationRepositoryError::Query { message } => {
            Error::internal(format!("reservation repository error: {message}")).into()
        }
    }
}
