//! Administrator operations on the doctor role.
//!
//! Revocation cascades: the doctor's windows and reservations are removed and
//! the account demoted in one atomic store operation. Only once that commits
//! are the affected clients and the acting administrator told which doctor's
//! reservations were cancelled.

use std::collections::BTreeSet;

use async_trait::async_trait;
use tracing::info;

use crate::domain::booking_support::{BookingPorts, map_account_error, map_revocation_error};
use crate::domain::ports::{DoctorRoleCommand, RevocationSummary, RevokedSchedule};
use crate::domain::{
    Account, BookingEvent, BookingResult, Error, Notification, Rejection, Role, Specialization,
    UserId,
};

/// Implements [`DoctorRoleCommand`].
#[derive(Clone)]
pub struct DoctorRoleService {
    ports: BookingPorts,
}

impl DoctorRoleService {
    /// Create the service over the shared driven ports.
    pub fn new(ports: BookingPorts) -> Self {
        Self { ports }
    }

    async fn set_role(
        &self,
        id: &UserId,
        role: Role,
        specialization: Option<Specialization>,
    ) -> BookingResult<()> {
        let updated = self
            .ports
            .accounts
            .update_role(id, role, specialization)
            .await
            .map_err(map_account_error)?;
        if updated {
            Ok(())
        } else {
            Err(Error::conflict("account disappeared during role change").into())
        }
    }
}

#[async_trait]
impl DoctorRoleCommand for DoctorRoleService {
    async fn assign(&self, user_id: &UserId, specialization: Specialization) -> BookingResult<Account> {
        let mut account = self.ports.require_account(user_id, "User").await?;
        if account.is_doctor() {
            return Err(Rejection::validation("This user is already a doctor.").into());
        }
        self.set_role(user_id, Role::Doctor, Some(specialization.clone()))
            .await?;
        account.role = Role::Doctor;
        account.specialization = Some(specialization);
        info!(user_id = %user_id, "doctor role assigned");
        Ok(account)
    }

    async fn revoke(&self, doctor_id: &UserId, acting_admin: &UserId) -> BookingResult<RevocationSummary> {
        let doctor = self.ports.require_account(doctor_id, "User").await?;
        if !doctor.is_doctor() {
            return Err(Rejection::validation("This user is not a doctor.").into());
        }

        let RevokedSchedule {
            deleted_availability_count,
            deleted_reservations,
        } = self
            .ports
            .revocations
            .revoke_doctor(doctor_id)
            .await
            .map_err(map_revocation_error)?
            .ok_or_else(|| Rejection::validation("This user is not a doctor."))?;
        self.ports.invalidate_schedule(doctor_id).await;

        let clients: BTreeSet<UserId> = deleted_reservations.iter().map(|r| r.client_id).collect();
        let mut notified: Vec<UserId> = clients.into_iter().collect();
        if !notified.contains(acting_admin) {
            notified.push(*acting_admin);
        }
        let event = BookingEvent::ReservationsDeleted {
            doctor_name: doctor.name.clone(),
            specialization: doctor.specialization_label(),
        };
        let notifications: Vec<Notification> = notified
            .iter()
            .map(|recipient| Notification::new(*recipient, event.clone()))
            .collect();
        self.ports.notify_all(notifications).await;

        info!(
            doctor_id = %doctor_id,
            admin_id = %acting_admin,
            deleted_availability = deleted_availability_count,
            deleted_reservations = deleted_reservations.len(),
            "doctor role revoked"
        );
        Ok(RevocationSummary {
            doctor_id: *doctor_id,
            deleted_availability_count,
            deleted_reservations,
            notified,
        })
    }
}

#[cfg(test)]
#[path = "doctor_role_service_tests.rs"]
mod tests;
