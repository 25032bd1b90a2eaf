//! Port for the doctor revocation cascade.
//!
//! Removing a doctor deletes their windows and reservations and demotes the
//! account. Adapters apply all three as one unit: either every change lands
//! or none does, so a failure never leaves a demoted-but-booked doctor or
//! silently cancelled reservations behind.

use async_trait::async_trait;

use crate::domain::{Reservation, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by revocation adapters. No change is applied when one
    /// is returned.
    pub enum DoctorRevocationError {
        /// The backing store could not be reached.
        Connection { message: String } =>
            "doctor revocation connection failed: {message}",
        /// A statement in the cascade failed and the cascade was rolled back.
        Query { message: String } =>
            "doctor revocation failed: {message}",
    }
}

/// What a committed revocation removed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RevokedSchedule {
    /// Number of availability windows deleted.
    pub deleted_availability_count: u64,
    /// Reservations deleted, as they were before removal.
    pub deleted_reservations: Vec<Reservation>,
}

/// Atomic removal of a doctor's schedule together with the role change.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DoctorRevocationRepository: Send + Sync {
    /// Delete every window and reservation of the doctor and demote the
    /// account to a client without a specialisation.
    ///
    /// Returns `None`, leaving the store untouched, when the account does
    /// not exist or is no longer a doctor.
    async fn revoke_doctor(
        &self,
        doctor_id: &UserId,
    ) -> Result<Option<RevokedSchedule>, DoctorRevocationError>;
}
