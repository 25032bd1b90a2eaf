//! Driving port for read-side schedule queries.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::domain::{Account, AdmissionDecision, BookingRequest, BookingResult, SlotSet, UserId};

/// A doctor's bookable calendar from `from` onwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorCalendar {
    /// Doctor the calendar belongs to.
    pub doctor_id: UserId,
    /// Doctor's display name.
    pub doctor_name: String,
    /// Specialisation label, if any.
    pub specialization: Option<String>,
    /// First date included; cached copies from an earlier day are stale.
    pub from: NaiveDate,
    /// Free half-hour slots per date.
    pub slots: SlotSet,
    /// Reserved slot starts per date.
    pub reserved: BTreeMap<NaiveDate, Vec<NaiveTime>>,
}

/// Read-side schedule queries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScheduleQuery: Send + Sync {
    /// Free slots for the doctor on `from` and later dates.
    async fn derive_slots(&self, doctor_id: &UserId, from: NaiveDate) -> BookingResult<SlotSet>;

    /// The doctor's calendar from today, served from cache when fresh.
    async fn doctor_calendar(&self, doctor_id: &UserId) -> BookingResult<DoctorCalendar>;

    /// Dry-run the admission rules without booking.
    async fn check_admission(&self, request: &BookingRequest) -> BookingResult<AdmissionDecision>;

    /// Doctors that have published at least one window.
    async fn list_doctors(&self) -> BookingResult<Vec<Account>>;
}
