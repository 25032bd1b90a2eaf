//! Booking domain: schedule primitives, rules, services and ports.
//!
//! The pure core (slot derivation and admission) has no I/O. Services in
//! this module orchestrate the core against the driven ports declared in
//! [`ports`].

pub mod account;
pub mod admission;
pub mod availability;
mod booking_support;
mod doctor_role_service;
pub mod error;
pub mod notification;
pub mod ports;
pub mod rejection;
pub mod reservation;
mod reservation_service;
mod schedule_service;
#[cfg(test)]
mod service_test_harness;
pub mod slots;
pub mod trace_id;

pub use self::account::{Account, AccountValidationError, Role, Specialization, UserId};
pub use self::admission::{AdmissionContext, AdmissionDecision, check_admission};
pub use self::availability::{AvailabilityId, AvailabilityWindow, WindowOrderError};
pub use self::booking_support::BookingPorts;
pub use self::doctor_role_service::DoctorRoleService;
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::notification::{BookingEvent, Notification};
pub use self::rejection::{BookingError, BookingResult, Rejection, RejectionReason};
pub use self::reservation::{BookingRequest, Reservation, ReservationId};
pub use self::reservation_service::ReservationService;
pub use self::schedule_service::ScheduleService;
pub use self::slots::{SLOT_MINUTES, SlotSet, derive_slot_set, reserved_times, window_slots};
pub use self::trace_id::TraceId;
