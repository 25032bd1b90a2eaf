//! PostgreSQL persistence adapters using Diesel with `diesel-async`.
//!
//! Adapters translate between Diesel rows and domain types; no booking rules
//! live here beyond the uniqueness indexes that back the slot and same-day
//! guarantees. Row structs and the schema are private to this module.

mod diesel_account_repository;
mod diesel_availability_repository;
mod diesel_doctor_revocation_repository;
mod diesel_notification_inbox;
mod diesel_reservation_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_availability_repository::DieselAvailabilityRepository;
pub use diesel_doctor_revocation_repository::DieselDoctorRevocationRepository;
pub use diesel_notification_inbox::DieselNotificationInbox;
pub use diesel_reservation_repository::DieselReservationRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
