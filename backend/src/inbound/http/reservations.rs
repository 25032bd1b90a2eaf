//! Client reservation handlers.
//!
//! ```text
//! GET    /api/v1/reservations
//! POST   /api/v1/reservations
//! DELETE /api/v1/reservations/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{BookingRequest, Error, Reservation, ReservationId, UserId};
use crate::inbound::http::access::Actor;
use crate::inbound::http::error::{ApiResult, booking};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, format_date, format_time, parse_date, parse_time, parse_user_id, parse_uuid,
    require,
};

const DOCTOR_ID: FieldName = FieldName::new("doctorId");
const DATE: FieldName = FieldName::new("date");
const TIME: FieldName = FieldName::new("time");

/// Doctor, date and time of a requested booking.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    /// Doctor to book with.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub doctor_id: Option<String>,
    /// Requested date, `YYYY-MM-DD`.
    #[schema(example = "2030-01-02")]
    pub date: Option<String>,
    /// Requested slot start, `HH:MM`.
    #[schema(example = "09:30")]
    pub time: Option<String>,
}

/// Validate a booking payload on behalf of `client_id`.
pub(crate) fn parse_booking(payload: BookingPayload, client_id: UserId) -> Result<BookingRequest, Error> {
    let doctor_id = require(payload.doctor_id, DOCTOR_ID)?;
    let date = require(payload.date, DATE)?;
    let time = require(payload.time, TIME)?;
    Ok(BookingRequest {
        doctor_id: parse_user_id(&doctor_id, DOCTOR_ID)?,
        client_id,
        date: parse_date(&date, DATE)?,
        time: parse_time(&time, TIME)?,
    })
}

/// A confirmed reservation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    /// Reservation identifier.
    pub id: String,
    /// Booked doctor.
    pub doctor_id: String,
    /// Client holding the booking.
    pub client_id: String,
    /// Date, `YYYY-MM-DD`.
    pub date: String,
    /// Slot start, `HH:MM`.
    pub time: String,
    /// Creation instant, RFC 3339.
    pub created_at: String,
}

impl From<Reservation> for ReservationResponse {
    fn from(reservation: Reservation) -> Self {
        Self {
            id: reservation.id.to_string(),
            doctor_id: reservation.doctor_id.to_string(),
            client_id: reservation.client_id.to_string(),
            date: format_date(reservation.date),
            time: format_time(reservation.time),
            created_at: reservation.created_at.to_rfc3339(),
        }
    }
}

/// Body returned when a reservation is stored.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservationCreatedResponse {
    /// Confirmation text.
    #[schema(example = "Reservation created successfully.")]
    pub message: String,
    /// The stored booking.
    pub reservation: ReservationResponse,
}

/// The caller's reservations, oldest slot first.
#[utoipa::path(
    get,
    path = "/api/v1/reservations",
    params(("x-user-id" = String, Header, description = "Authenticated account id")),
    responses(
        (status = 200, description = "Reservations", body = [ReservationResponse]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["reservations"],
    operation_id = "listReservations"
)]
#[get("/reservations")]
pub async fn list_reservations(
    state: web::Data<HttpState>,
    actor: Actor,
) -> ApiResult<web::Json<Vec<ReservationResponse>>> {
    let reservations = booking(state.reservations.list_for_client(&actor.id()).await)?;
    Ok(web::Json(
        reservations
            .into_iter()
            .map(ReservationResponse::from)
            .collect(),
    ))
}

/// Book a slot with a doctor.
#[utoipa::path(
    post,
    path = "/api/v1/reservations",
    request_body = BookingPayload,
    params(("x-user-id" = String, Header, description = "Authenticated account id")),
    responses(
        (status = 201, description = "Reservation created", body = ReservationCreatedResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Doctor not found", body = Error),
        (status = 422, description = "Slot unavailable, taken, or already booked that day", body = Error)
    ),
    tags = ["reservations"],
    operation_id = "createReservation"
)]
#[post("/reservations")]
pub async fn create_reservation(
    state: web::Data<HttpState>,
    actor: Actor,
    payload: web::Json<BookingPayload>,
) -> ApiResult<HttpResponse> {
    let request = parse_booking(payload.into_inner(), actor.id())?;
    let reservation = booking(state.reservations.create(request).await)?;
    Ok(HttpResponse::Created().json(ReservationCreatedResponse {
        message: "Reservation created successfully.".to_owned(),
        reservation: reservation.into(),
    }))
}

/// Cancel one of the caller's reservations.
#[utoipa::path(
    delete,
    path = "/api/v1/reservations/{id}",
    params(
        ("id" = String, Path, description = "Reservation id"),
        ("x-user-id" = String, Header, description = "Authenticated account id")
    ),
    responses(
        (status = 204, description = "Reservation cancelled"),
        (status = 403, description = "Not the caller's reservation", body = Error),
        (status = 404, description = "Reservation not found", body = Error)
    ),
    tags = ["reservations"],
    operation_id = "cancelReservation"
)]
#[delete("/reservations/{id}")]
pub async fn cancel_reservation(
    state: web::Data<HttpState>,
    actor: Actor,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = ReservationId::from_uuid(parse_uuid(&path.into_inner(), FieldName::new("id"))?);
    booking(state.reservations.cancel(&id, &actor.id()).await)?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "reservations_tests.rs"]
mod tests;
