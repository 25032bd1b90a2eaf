//! Doctor directory, calendar and admission dry-run handlers.
//!
//! ```text
//! GET  /api/v1/doctors
//! GET  /api/v1/doctors/{id}/calendar
//! POST /api/v1/admission-checks
//! ```

use std::collections::BTreeMap;

use actix_web::{get, post, web};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::DoctorCalendar;
use crate::domain::{Account, AdmissionDecision, Error, RejectionReason, Role};
use crate::inbound::http::access::Actor;
use crate::inbound::http::error::{ApiResult, booking};
use crate::inbound::http::reservations::{BookingPayload, parse_booking};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, format_date, format_time, parse_user_id};

/// Directory entry for a doctor who has published availability.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoctorSummary {
    /// Doctor identifier.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Medical specialisation.
    #[schema(example = "Cardiologist")]
    pub specialization: Option<String>,
}

impl From<Account> for DoctorSummary {
    fn from(account: Account) -> Self {
        Self {
            id: account.id.to_string(),
            specialization: account.specialization_label(),
            name: account.name,
        }
    }
}

/// Free slots and booked times per date, from today onwards.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalendarResponse {
    /// Doctor identifier.
    pub doctor_id: String,
    /// Display name.
    pub doctor_name: String,
    /// Medical specialisation, if set.
    pub specialization: Option<String>,
    /// First date covered, `YYYY-MM-DD`.
    #[schema(example = "2030-01-02")]
    pub from: String,
    /// Date to free `HH:MM` start times.
    pub slots: BTreeMap<String, Vec<String>>,
    /// Date to already reserved `HH:MM` times.
    pub reserved: BTreeMap<String, Vec<String>>,
}

fn format_day<'a>(
    entries: impl Iterator<Item = (&'a NaiveDate, &'a Vec<NaiveTime>)>,
) -> BTreeMap<String, Vec<String>> {
    entries
        .map(|(date, times)| {
            (
                format_date(*date),
                times.iter().copied().map(format_time).collect(),
            )
        })
        .collect()
}

impl From<DoctorCalendar> for CalendarResponse {
    fn from(calendar: DoctorCalendar) -> Self {
        Self {
            doctor_id: calendar.doctor_id.to_string(),
            doctor_name: calendar.doctor_name,
            specialization: calendar.specialization,
            from: format_date(calendar.from),
            slots: format_day(calendar.slots.iter()),
            reserved: format_day(calendar.reserved.iter()),
        }
    }
}

/// Outcome of an admission dry run.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionCheckResponse {
    /// Whether the booking would be admitted.
    pub accepted: bool,
    /// Refusal reason when not accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<RejectionReason>,
    /// Refusal message when not accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<AdmissionDecision> for AdmissionCheckResponse {
    fn from(decision: AdmissionDecision) -> Self {
        match decision {
            AdmissionDecision::Accept => Self {
                accepted: true,
                reason: None,
                message: None,
            },
            AdmissionDecision::Reject(rejection) => Self {
                accepted: false,
                reason: Some(rejection.reason()),
                message: Some(rejection.message().to_owned()),
            },
        }
    }
}

/// List doctors that have published at least one availability window.
#[utoipa::path(
    get,
    path = "/api/v1/doctors",
    responses(
        (status = 200, description = "Doctor directory", body = [DoctorSummary]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    params(("x-user-id" = String, Header, description = "Authenticated account id")),
    tags = ["schedule"],
    operation_id = "listDoctors"
)]
#[get("/doctors")]
pub async fn list_doctors(
    state: web::Data<HttpState>,
    _actor: Actor,
) -> ApiResult<web::Json<Vec<DoctorSummary>>> {
    let doctors = booking(state.schedule.list_doctors().await)?;
    Ok(web::Json(doctors.into_iter().map(DoctorSummary::from).collect()))
}

/// A doctor's bookable calendar from today onwards.
#[utoipa::path(
    get,
    path = "/api/v1/doctors/{id}/calendar",
    params(
        ("id" = String, Path, description = "Doctor account id"),
        ("x-user-id" = String, Header, description = "Authenticated account id")
    ),
    responses(
        (status = 200, description = "Doctor calendar", body = CalendarResponse),
        (status = 400, description = "Invalid doctor id", body = Error),
        (status = 404, description = "Doctor not found", body = Error)
    ),
    tags = ["schedule"],
    operation_id = "getDoctorCalendar"
)]
#[get("/doctors/{id}/calendar")]
pub async fn doctor_calendar(
    state: web::Data<HttpState>,
    _actor: Actor,
    path: web::Path<String>,
) -> ApiResult<web::Json<CalendarResponse>> {
    let doctor_id = parse_user_id(&path.into_inner(), FieldName::new("id"))?;
    let calendar = booking(state.schedule.doctor_calendar(&doctor_id).await)?;
    Ok(web::Json(calendar.into()))
}

/// Check whether the caller could book a slot, without booking it.
#[utoipa::path(
    post,
    path = "/api/v1/admission-checks",
    request_body = BookingPayload,
    params(("x-user-id" = String, Header, description = "Authenticated account id")),
    responses(
        (status = 200, description = "Admission decision", body = AdmissionCheckResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Only clients may check admission", body = Error)
    ),
    tags = ["schedule"],
    operation_id = "checkAdmission"
)]
#[post("/admission-checks")]
pub async fn check_admission(
    state: web::Data<HttpState>,
    actor: Actor,
    payload: web::Json<BookingPayload>,
) -> ApiResult<web::Json<AdmissionCheckResponse>> {
    actor.require(Role::Client)?;
    let request = parse_booking(payload.into_inner(), actor.id())?;
    let decision = booking(state.schedule.check_admission(&request).await)?;
    Ok(web::Json(decision.into()))
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
