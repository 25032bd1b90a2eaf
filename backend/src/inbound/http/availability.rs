//! Doctor availability handlers.
//!
//! ```text
//! GET    /api/v1/doctor/availability
//! POST   /api/v1/doctor/availability
//! DELETE /api/v1/doctor/availability/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::PublishAvailabilityRequest;
use crate::domain::{AvailabilityId, AvailabilityWindow, Error, Role, UserId};
use crate::inbound::http::access::Actor;
use crate::inbound::http::error::{ApiResult, booking};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, format_date, format_time, parse_date, parse_time, parse_uuid, require,
};

const DATE: FieldName = FieldName::new("date");
const START: FieldName = FieldName::new("startTime");
const END: FieldName = FieldName::new("endTime");

/// A window to publish.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityPayload {
    /// Window date, `YYYY-MM-DD`.
    #[schema(example = "2030-01-02")]
    pub date: Option<String>,
    /// Window start, `HH:MM`.
    #[schema(example = "09:00")]
    pub start_time: Option<String>,
    /// Window end, `HH:MM`. Exclusive.
    #[schema(example = "12:00")]
    pub end_time: Option<String>,
}

fn parse_availability(
    payload: AvailabilityPayload,
    doctor_id: UserId,
) -> Result<PublishAvailabilityRequest, Error> {
    let date = require(payload.date, DATE)?;
    let start = require(payload.start_time, START)?;
    let end = require(payload.end_time, END)?;
    Ok(PublishAvailabilityRequest {
        doctor_id,
        date: parse_date(&date, DATE)?,
        start: parse_time(&start, START)?,
        end: parse_time(&end, END)?,
    })
}

/// A published window.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    /// Window identifier.
    pub id: String,
    /// Window date.
    pub date: String,
    /// Window start.
    pub start_time: String,
    /// Window end.
    pub end_time: String,
}

impl From<AvailabilityWindow> for AvailabilityResponse {
    fn from(window: AvailabilityWindow) -> Self {
        Self {
            id: window.id().to_string(),
            date: format_date(window.date()),
            start_time: format_time(window.start()),
            end_time: format_time(window.end()),
        }
    }
}

/// The calling doctor's windows from today onwards.
#[utoipa::path(
    get,
    path = "/api/v1/doctor/availability",
    params(("x-user-id" = String, Header, description = "Authenticated account id")),
    responses(
        (status = 200, description = "Own availability", body = [AvailabilityResponse]),
        (status = 403, description = "Caller is not a doctor", body = Error)
    ),
    tags = ["availability"],
    operation_id = "listOwnAvailability"
)]
#[get("/doctor/availability")]
pub async fn list_availability(
    state: web::Data<HttpState>,
    actor: Actor,
) -> ApiResult<web::Json<Vec<AvailabilityResponse>>> {
    actor.require(Role::Doctor)?;
    let windows = booking(state.availability.list_own(&actor.id()).await)?;
    Ok(web::Json(
        windows.into_iter().map(AvailabilityResponse::from).collect(),
    ))
}

/// Publish a new window for the calling doctor.
#[utoipa::path(
    post,
    path = "/api/v1/doctor/availability",
    request_body = AvailabilityPayload,
    params(("x-user-id" = String, Header, description = "Authenticated account id")),
    responses(
        (status = 201, description = "Window published", body = AvailabilityResponse),
        (status = 400, description = "Invalid window", body = Error),
        (status = 403, description = "Caller is not a doctor", body = Error)
    ),
    tags = ["availability"],
    operation_id = "publishAvailability"
)]
#[post("/doctor/availability")]
pub async fn publish_availability(
    state: web::Data<HttpState>,
    actor: Actor,
    payload: web::Json<AvailabilityPayload>,
) -> ApiResult<HttpResponse> {
    actor.require(Role::Doctor)?;
    let request = parse_availability(payload.into_inner(), actor.id())?;
    let window = booking(state.availability.publish(request).await)?;
    Ok(HttpResponse::Created().json(AvailabilityResponse::from(window)))
}

/// Withdraw one of the calling doctor's windows.
#[utoipa::path(
    delete,
    path = "/api/v1/doctor/availability/{id}",
    params(
        ("id" = String, Path, description = "Availability window id"),
        ("x-user-id" = String, Header, description = "Authenticated account id")
    ),
    responses(
        (status = 204, description = "Window withdrawn"),
        (status = 403, description = "Not the caller's window", body = Error),
        (status = 404, description = "Window not found", body = Error)
    ),
    tags = ["availability"],
    operation_id = "withdrawAvailability"
)]
#[delete("/doctor/availability/{id}")]
pub async fn withdraw_availability(
    state: web::Data<HttpState>,
    actor: Actor,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    actor.require(Role::Doctor)?;
    let id = AvailabilityId::from_uuid(parse_uuid(&path.into_inner(), FieldName::new("id"))?);
    booking(state.availability.withdraw(&id, &actor.id()).await)?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "availability_tests.rs"]
mod tests;
