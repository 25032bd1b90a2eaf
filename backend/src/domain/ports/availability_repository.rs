//! Port for availability window persistence.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{AvailabilityId, AvailabilityWindow, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by availability repository adapters.
    pub enum AvailabilityRepositoryError {
        /// The backing store could not be reached.
        Connection { message: String } =>
            "availability repository connection failed: {message}",
        /// A query or mutation failed.
        Query { message: String } =>
            "availability repository query failed: {message}",
    }
}

/// Storage for doctors' availability windows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    /// Persist a new window.
    async fn insert(&self, window: &AvailabilityWindow) -> Result<(), AvailabilityRepositoryError>;

    /// Fetch a window by id.
    async fn find_by_id(
        &self,
        id: &AvailabilityId,
    ) -> Result<Option<AvailabilityWindow>, AvailabilityRepositoryError>;

    /// Delete one window. Returns `false` when it did not exist.
    async fn delete(&self, id: &AvailabilityId) -> Result<bool, AvailabilityRepositoryError>;

    /// The doctor's windows dated `from` or later, ordered by date then start.
    async fn list_for_doctor(
        &self,
        doctor_id: &UserId,
        from: NaiveDate,
    ) -> Result<Vec<AvailabilityWindow>, AvailabilityRepositoryError>;

    /// The doctor's windows on exactly `date`.
    async fn list_for_doctor_on(
        &self,
        doctor_id: &UserId,
        date: NaiveDate,
    ) -> Result<Vec<AvailabilityWindow>, AvailabilityRepositoryError>;
}
