//! Administrator handlers for doctor role management.
//!
//! ```text
//! POST /api/v1/admin/doctors/{id}/assign
//! POST /api/v1/admin/doctors/{id}/remove
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::RevocationSummary;
use crate::domain::{Account, Error, Role};
use crate::inbound::http::access::Actor;
use crate::inbound::http::error::{ApiResult, booking};
use crate::inbound::http::reservations::ReservationResponse;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_specialization, parse_user_id, require};

const SPECIALIZATION: FieldName = FieldName::new("specialization");

/// Body of a doctor assignment.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignDoctorPayload {
    /// Specialisation to grant.
    #[schema(example = "Cardiologist")]
    pub specialization: Option<String>,
}

/// Account view returned after a role change.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    /// Account identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Role after the change.
    #[schema(example = "doctor")]
    pub role: String,
    /// Specialisation, present for doctors.
    pub specialization: Option<String>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id.to_string(),
            role: account.role.as_str().to_owned(),
            specialization: account.specialization_label(),
            name: account.name,
            email: account.email,
        }
    }
}

/// What a revocation removed.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RevocationResponse {
    /// The demoted account.
    pub doctor_id: String,
    /// Windows removed.
    pub deleted_availability_count: u64,
    /// Reservations removed.
    pub deleted_reservations: Vec<ReservationResponse>,
    /// Accounts that were sent a cancellation notice.
    pub notified: Vec<String>,
}

impl From<RevocationSummary> for RevocationResponse {
    fn from(summary: RevocationSummary) -> Self {
        Self {
            doctor_id: summary.doctor_id.to_string(),
            deleted_availability_count: summary.deleted_availability_count,
            deleted_reservations: summary
                .deleted_reservations
                .into_iter()
                .map(ReservationResponse::from)
                .collect(),
            notified: summary.notified.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Grant the doctor role with a specialisation.
#[utoipa::path(
    post,
    path = "/api/v1/admin/doctors/{id}/assign",
    request_body = AssignDoctorPayload,
    params(
        ("id" = String, Path, description = "Account to promote"),
        ("x-user-id" = String, Header, description = "Authenticated administrator id")
    ),
    responses(
        (status = 200, description = "Role assigned", body = AccountResponse),
        (status = 400, description = "Invalid request or already a doctor", body = Error),
        (status = 403, description = "Caller is not an administrator", body = Error),
        (status = 404, description = "User not found", body = Error)
    ),
    tags = ["admin"],
    operation_id = "assignDoctor"
)]
#[post("/admin/doctors/{id}/assign")]
pub async fn assign_doctor(
    state: web::Data<HttpState>,
    actor: Actor,
    path: web::Path<String>,
    payload: web::Json<AssignDoctorPayload>,
) -> ApiResult<web::Json<AccountResponse>> {
    actor.require(Role::Admin)?;
    let user_id = parse_user_id(&path.into_inner(), FieldName::new("id"))?;
    let specialization = parse_specialization(
        require(payload.into_inner().specialization, SPECIALIZATION)?,
        SPECIALIZATION,
    )?;
    let account = booking(state.doctor_roles.assign(&user_id, specialization).await)?;
    Ok(web::Json(account.into()))
}

/// Revoke the doctor role and cancel everything the doctor had.
#[utoipa::path(
    post,
    path = "/api/v1/admin/doctors/{id}/remove",
    params(
        ("id" = String, Path, description = "Doctor to demote"),
        ("x-user-id" = String, Header, description = "Authenticated administrator id")
    ),
    responses(
        (status = 200, description = "Role revoked", body = RevocationResponse),
        (status = 400, description = "User is not a doctor", body = Error),
        (status = 403, description = "Caller is not an administrator", body = Error),
        (status = 404, description = "User not found", body = Error)
    ),
    tags = ["admin"],
    operation_id = "removeDoctor"
)]
#[post("/admin/doctors/{id}/remove")]
pub async fn remove_doctor(
    state: web::Data<HttpState>,
    actor: Actor,
    path: web::Path<String>,
) -> ApiResult<web::Json<RevocationResponse>> {
    actor.require(Role::Admin)?;
    let doctor_id = parse_user_id(&path.into_inner(), FieldName::new("id"))?;
    let summary = booking(state.doctor_roles.revoke(&doctor_id, &actor.id()).await)?;
    Ok(web::Json(summary.into()))
}

#[cfg(test)]
#[path = "admin_tests.rs"]
mod tests;
