//! Shared HTTP adapter state.
//!
//! Handlers take this via `web::Data` and only see driving ports, so they
//! can be exercised with mocks and no I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountRepository, AvailabilityCommand, DoctorRoleCommand, ReservationCommand, ScheduleQuery,
};
use crate::domain::{BookingPorts, DoctorRoleService, ReservationService, ScheduleService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Read-side schedule queries.
    pub schedule: Arc<dyn ScheduleQuery>,
    /// Doctor availability management.
    pub availability: Arc<dyn AvailabilityCommand>,
    /// Reservation lifecycle.
    pub reservations: Arc<dyn ReservationCommand>,
    /// Doctor role administration.
    pub doctor_roles: Arc<dyn DoctorRoleCommand>,
    /// Used by the access gate to resolve the acting account.
    pub accounts: Arc<dyn AccountRepository>,
}

impl HttpState {
    /// Wire the booking services over a set of driven ports.
    pub fn from_ports(ports: BookingPorts) -> Self {
        let schedule = Arc::new(ScheduleService::new(ports.clone()));
        Self {
            schedule: schedule.clone(),
            availability: schedule,
            reservations: Arc::new(ReservationService::new(ports.clone())),
            doctor_roles: Arc::new(DoctorRoleService::new(ports.clone())),
            accounts: ports.accounts,
        }
    }
}
