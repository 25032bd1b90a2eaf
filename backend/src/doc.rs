//! OpenAPI documentation for the booking API.
//!
//! Swagger UI serves this document at `/docs` in debug builds, and the
//! `openapi-dump` binary prints it for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, RejectionReason};
use crate::inbound::http::admin::{
    AccountResponse, AssignDoctorPayload, RevocationResponse,
};
use crate::inbound::http::availability::{AvailabilityPayload, AvailabilityResponse};
use crate::inbound::http::reservations::{
    BookingPayload, ReservationCreatedResponse, ReservationResponse,
};
use crate::inbound::http::schedule::{AdmissionCheckResponse, CalendarResponse, DoctorSummary};

/// Registers the `x-user-id` header scheme set by the authenticating proxy.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme(
            "UserIdHeader",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "x-user-id",
                "Account id asserted by the upstream authenticating proxy.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "medbook API",
        description = "Doctor availability, slot calendars and reservations."
    ),
    servers((url = "/", description = "Relative to the deployment base URL")),
    security(("UserIdHeader" = [])),
    paths(
        crate::inbound::http::schedule::list_doctors,
        crate::inbound::http::schedule::doctor_calendar,
        crate::inbound::http::schedule::check_admission,
        crate::inbound::http::reservations::list_reservations,
        crate::inbound::http::reservations::create_reservation,
        crate::inbound::http::reservations::cancel_reservation,
        crate::inbound::http::availability::list_availability,
        crate::inbound::http::availability::publish_availability,
        crate::inbound::http::availability::withdraw_availability,
        crate::inbound::http::admin::assign_doctor,
        crate::inbound::http::admin::remove_doctor,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        RejectionReason,
        DoctorSummary,
        CalendarResponse,
        AdmissionCheckResponse,
        BookingPayload,
        ReservationResponse,
        ReservationCreatedResponse,
        AvailabilityPayload,
        AvailabilityResponse,
        AssignDoctorPayload,
        AccountResponse,
        RevocationResponse,
    )),
    tags(
        (name = "schedule", description = "Doctor directory and calendars"),
        (name = "reservations", description = "Client bookings"),
        (name = "availability", description = "Doctor availability windows"),
        (name = "admin", description = "Doctor role administration"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
/// OpenAPI document for the booking API.
pub struct ApiDoc;
