//! Domain ports for the hexagonal boundary.
//!
//! Driving ports (`*Query`, `*Command`) are implemented by the booking
//! services and called by inbound adapters. Driven ports (repositories, the
//! schedule cache and the notification dispatcher) are implemented by
//! outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_repository;
mod availability_command;
mod availability_repository;
mod doctor_revocation_repository;
mod doctor_role_command;
mod notification_dispatcher;
mod reservation_command;
mod reservation_repository;
mod schedule_cache;
mod schedule_query;

pub use account_repository::{AccountRepository, AccountRepositoryError};
pub use availability_command::{AvailabilityCommand, PublishAvailabilityRequest};
pub use availability_repository::{AvailabilityRepository, AvailabilityRepositoryError};
pub use doctor_revocation_repository::{
    DoctorRevocationError, DoctorRevocationRepository, RevokedSchedule,
};
pub use doctor_role_command::{DoctorRoleCommand, RevocationSummary};
pub use notification_dispatcher::{NotificationDispatchError, NotificationDispatcher};
pub use reservation_command::ReservationCommand;
pub use reservation_repository::{ReservationRepository, ReservationRepositoryError};
pub use schedule_cache::{
    CacheGeneration, ScheduleCache, ScheduleCacheError, ScheduleCacheKey, ScheduleView,
};
pub use schedule_query::{DoctorCalendar, ScheduleQuery};

#[cfg(test)]
pub use account_repository::MockAccountRepository;
#[cfg(test)]
pub use availability_command::MockAvailabilityCommand;
#[cfg(test)]
pub use availability_repository::MockAvailabilityRepository;
#[cfg(test)]
pub use doctor_revocation_repository::MockDoctorRevocationRepository;
#[cfg(test)]
pub use doctor_role_command::MockDoctorRoleCommand;
#[cfg(test)]
pub use notification_dispatcher::MockNotificationDispatcher;
#[cfg(test)]
pub use reservation_command::MockReservationCommand;
#[cfg(test)]
pub use reservation_repository::MockReservationRepository;
#[cfg(test)]
pub use schedule_cache::MockScheduleCache;
#[cfg(test)]
pub use schedule_query::MockScheduleQuery;
