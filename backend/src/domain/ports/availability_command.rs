//! Driving port for doctors managing their own availability.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};

use crate::domain::{AvailabilityId, AvailabilityWindow, BookingResult, UserId};

/// A doctor's request to open a new window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishAvailabilityRequest {
    /// Publishing doctor.
    pub doctor_id: UserId,
    /// Date of the window.
    pub date: NaiveDate,
    /// Window start.
    pub start: NaiveTime,
    /// Window end, exclusive.
    pub end: NaiveTime,
}

/// Doctor-facing availability management.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AvailabilityCommand: Send + Sync {
    /// Open a window. The doctor needs a specialisation and the date may not
    /// be in the past.
    async fn publish(&self, request: PublishAvailabilityRequest) -> BookingResult<AvailabilityWindow>;

    /// Withdraw one of the doctor's own windows.
    async fn withdraw(&self, id: &AvailabilityId, doctor_id: &UserId) -> BookingResult<()>;

    /// The doctor's windows from today onwards.
    async fn list_own(&self, doctor_id: &UserId) -> BookingResult<Vec<AvailabilityWindow>>;
}
