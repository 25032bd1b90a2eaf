//! Driving port for administrators managing the doctor role.

use async_trait::async_trait;

use crate::domain::{Account, BookingResult, Reservation, Specialization, UserId};

/// What a doctor revocation removed and who was told.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevocationSummary {
    /// The demoted account.
    pub doctor_id: UserId,
    /// Windows removed.
    pub deleted_availability_count: u64,
    /// Reservations removed.
    pub deleted_reservations: Vec<Reservation>,
    /// Distinct clients plus the acting administrator.
    pub notified: Vec<UserId>,
}

/// Administrator operations on the doctor role.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DoctorRoleCommand: Send + Sync {
    /// Promote an account to doctor with the given specialisation.
    async fn assign(&self, user_id: &UserId, specialization: Specialization) -> BookingResult<Account>;

    /// Demote a doctor, cascading the removal of all their windows and
    /// reservations.
    async fn revoke(&self, doctor_id: &UserId, acting_admin: &UserId) -> BookingResult<RevocationSummary>;
}
