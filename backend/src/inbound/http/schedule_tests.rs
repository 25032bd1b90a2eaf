//! Handler tests for the schedule endpoints.

use std::collections::BTreeMap;

use actix_web::http::StatusCode;
use actix_web::test;
use chrono::{NaiveDate, NaiveTime};
use mockall::predicate::always;
use rstest::rstest;
use serde_json::json;

use super::*;
use crate::domain::ports::DoctorCalendar;
use crate::domain::{
    AvailabilityId, AvailabilityWindow, BookingError, Rejection, UserId, derive_slot_set,
};
use crate::inbound::http::access::USER_ID_HEADER;
use crate::inbound::http::test_utils::{StateMocks, send};
use crate::test_support::{client, doctor};

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 1, day).expect("valid date")
}

fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).expect("valid time")
}

#[rstest]
#[actix_web::test]
async fn directory_lists_doctor_summaries() {
    let caller = client("Casey");
    let listed = doctor("Grey", "Surgeon");
    let listed_id = listed.id.to_string();
    let mut mocks = StateMocks::new().signed_in(&caller);
    mocks
        .schedule
        .expect_list_doctors()
        .times(1)
        .return_once(move || Ok(vec![listed]));

    let (status, body) = send(
        mocks,
        test::TestRequest::get()
            .uri("/api/v1/doctors")
            .insert_header((USER_ID_HEADER, caller.id.to_string())),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{ "id": listed_id, "name": "Grey", "specialization": "Surgeon" }])
    );
}

#[rstest]
#[actix_web::test]
async fn calendar_formats_dates_and_times() {
    let caller = client("Casey");
    let grey = doctor("Grey", "Surgeon");
    let window = AvailabilityWindow::new(
        AvailabilityId::random(),
        grey.id,
        date(2),
        time(9, 0),
        time(10, 0),
    )
    .expect("ordered window");
    let calendar = DoctorCalendar {
        doctor_id: grey.id,
        doctor_name: grey.name.clone(),
        specialization: grey.specialization_label(),
        from: date(1),
        slots: derive_slot_set(&[window], &[], date(1)),
        reserved: BTreeMap::from([(date(2), vec![time(9, 30)])]),
    };
    let grey_id = grey.id;
    let mut mocks = StateMocks::new().signed_in(&caller);
    mocks
        .schedule
        .expect_doctor_calendar()
        .withf(move |id| *id == grey_id)
        .return_once(move |_| Ok(calendar));

    let (status, body) = send(
        mocks,
        test::TestRequest::get()
            .uri(&format!("/api/v1/doctors/{grey_id}/calendar"))
            .insert_header((USER_ID_HEADER, caller.id.to_string())),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["from"], "2030-01-01");
    assert_eq!(body["slots"]["2030-01-02"], json!(["09:00", "09:30"]));
    assert_eq!(body["reserved"]["2030-01-02"], json!(["09:30"]));
    assert_eq!(body["specialization"], "Surgeon");
}

#[rstest]
#[actix_web::test]
async fn calendar_rejects_malformed_doctor_id() {
    let caller = client("Casey");
    let (status, body) = send(
        StateMocks::new().signed_in(&caller),
        test::TestRequest::get()
            .uri("/api/v1/doctors/not-a-uuid/calendar")
            .insert_header((USER_ID_HEADER, caller.id.to_string())),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["code"], "invalid_uuid");
}

#[rstest]
#[actix_web::test]
async fn unknown_doctor_calendar_is_not_found() {
    let caller = client("Casey");
    let mut mocks = StateMocks::new().signed_in(&caller);
    mocks
        .schedule
        .expect_doctor_calendar()
        .with(always())
        .return_once(|_| Err(BookingError::Rejected(Rejection::not_found("Doctor not found."))));

    let (status, body) = send(
        mocks,
        test::TestRequest::get()
            .uri(&format!("/api/v1/doctors/{}/calendar", UserId::random()))
            .insert_header((USER_ID_HEADER, caller.id.to_string())),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["details"]["reason"], "not_found");
}

#[rstest]
#[actix_web::test]
async fn admission_check_reports_rejection_reason() {
    let caller = client("Casey");
    let caller_id = caller.id;
    let doctor_id = UserId::random();
    let mut mocks = StateMocks::new().signed_in(&caller);
    mocks
        .schedule
        .expect_check_admission()
        .withf(move |request| {
            request.client_id == caller_id
                && request.doctor_id == doctor_id
                && request.time == time(9, 30)
        })
        .return_once(|_| Ok(AdmissionDecision::Reject(Rejection::slot_taken())));

    let (status, body) = send(
        mocks,
        test::TestRequest::post()
            .uri("/api/v1/admission-checks")
            .insert_header((USER_ID_HEADER, caller_id.to_string()))
            .set_json(json!({ "doctorId": doctor_id.to_string(), "date": "2030-01-02", "time": "09:30" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["accepted"], false);
    assert_eq!(body["reason"], "slot_taken");
    assert_eq!(body["message"], "This time slot is already booked.");
}

#[rstest]
#[actix_web::test]
async fn admission_check_accepts_with_bare_body() {
    let caller = client("Casey");
    let mut mocks = StateMocks::new().signed_in(&caller);
    mocks
        .schedule
        .expect_check_admission()
        .return_once(|_| Ok(AdmissionDecision::Accept));

    let (status, body) = send(
        mocks,
        test::TestRequest::post()
            .uri("/api/v1/admission-checks")
            .insert_header((USER_ID_HEADER, caller.id.to_string()))
            .set_json(json!({ "doctorId": UserId::random().to_string(), "date": "2030-01-02", "time": "09:00" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "accepted": true }));
}

#[rstest]
#[actix_web::test]
async fn admission_check_is_client_only() {
    let caller = doctor("Grey", "Surgeon");
    let (status, body) = send(
        StateMocks::new().signed_in(&caller),
        test::TestRequest::post()
            .uri("/api/v1/admission-checks")
            .insert_header((USER_ID_HEADER, caller.id.to_string()))
            .set_json(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Access denied.");
}

#[rstest]
#[actix_web::test]
async fn admission_check_names_missing_fields() {
    let caller = client("Casey");
    let (status, body) = send(
        StateMocks::new().signed_in(&caller),
        test::TestRequest::post()
            .uri("/api/v1/admission-checks")
            .insert_header((USER_ID_HEADER, caller.id.to_string()))
            .set_json(json!({ "doctorId": UserId::random().to_string(), "date": "2030-01-02" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "time");
}
