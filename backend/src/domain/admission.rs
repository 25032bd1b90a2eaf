//! Admission checks for booking requests.
//!
//! Checks run in a fixed order and the first failure wins:
//!
//! 1. the date must not be in the past;
//! 2. a window must cover the time, end inclusive;
//! 3. the slot must not already be reserved;
//! 4. the client must not already hold a booking with the doctor that day.
//!
//! There is no per-day cap on a doctor's bookings.

use chrono::NaiveDate;

use super::{AvailabilityWindow, BookingRequest, Rejection, Reservation};

/// Outcome of [`check_admission`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdmissionDecision {
    /// The request may be persisted.
    Accept,
    /// The request breaks a booking rule.
    Reject(Rejection),
}

impl AdmissionDecision {
    /// Whether the request passed every rule.
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accept)
    }

    /// Convert into a `Result`, for use with `?`.
    pub fn into_result(self) -> Result<(), Rejection> {
        match self {
            Self::Accept => Ok(()),
            Self::Reject(rejection) => Err(rejection),
        }
    }
}

/// Schedule state an admission decision is taken against.
///
/// Callers may pass the doctor's whole schedule or only the requested date;
/// entries for other doctors or dates are ignored.
#[derive(Debug, Clone, Copy)]
pub struct AdmissionContext<'a> {
    /// Current date; earlier requests are refused.
    pub today: NaiveDate,
    /// The doctor's windows.
    pub windows: &'a [AvailabilityWindow],
    /// The doctor's existing reservations.
    pub reservations: &'a [Reservation],
}

/// Decide whether `request` may be booked.
#[must_use]
pub fn check_admission(request: &BookingRequest, context: AdmissionContext<'_>) -> AdmissionDecision {
    if request.date < context.today {
        return AdmissionDecision::Reject(Rejection::validation(
            "The reservation date must be today or later.",
        ));
    }

    let covered = context
        .windows
        .iter()
        .filter(|w| w.doctor_id() == request.doctor_id)
        .any(|w| w.admits(request.date, request.time));
    if !covered {
        return AdmissionDecision::Reject(Rejection::not_available());
    }

    let reservations = context.reservations;
    if reservations
        .iter()
        .any(|r| r.occupies(request.doctor_id, request.date, request.time))
    {
        return AdmissionDecision::Reject(Rejection::slot_taken());
    }

    if reservations
        .iter()
        .any(|r| r.books_client_on(request.doctor_id, request.client_id, request.date))
    {
        return AdmissionDecision::Reject(Rejection::duplicate_by_client());
    }

    AdmissionDecision::Accept
}

#[cfg(test)]
#[path = "admission_tests.rs"]
mod tests;
