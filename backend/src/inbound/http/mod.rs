//! HTTP inbound adapter exposing the booking REST API.

pub mod access;
pub mod admin;
pub mod availability;
pub mod error;
pub mod health;
pub mod reservations;
pub mod schedule;
pub mod state;
#[cfg(test)]
pub(crate) mod test_utils;
pub(crate) mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api/v1` handler on `cfg`.
///
/// Callers mount this inside a `web::scope("/api/v1")` and provide
/// `web::Data<HttpState>`.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(schedule::list_doctors)
        .service(schedule::doctor_calendar)
        .service(schedule::check_admission)
        .service(reservations::list_reservations)
        .service(reservations::create_reservation)
        .service(reservations::cancel_reservation)
        .service(availability::list_availability)
        .service(availability::publish_availability)
        .service(availability::withdraw_availability)
        .service(admin::assign_doctor)
        .service(admin::remove_doctor);
}
