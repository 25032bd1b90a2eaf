//! Handler tests for doctor availability.

use actix_web::http::StatusCode;
use actix_web::test;
use chrono::{NaiveDate, NaiveTime};
use rstest::rstest;
use serde_json::json;

use super::*;
use crate::domain::{BookingError, Rejection};
use crate::inbound::http::access::USER_ID_HEADER;
use crate::inbound::http::test_utils::{StateMocks, send};
use crate::test_support::{client, doctor};

fn window(doctor_id: UserId) -> AvailabilityWindow {
    AvailabilityWindow::new(
        AvailabilityId::random(),
        doctor_id,
        NaiveDate::from_ymd_opt(2030, 1, 2).expect("date"),
        NaiveTime::from_hms_opt(9, 0, 0).expect("time"),
        NaiveTime::from_hms_opt(12, 0, 0).expect("time"),
    )
    .expect("ordered window")
}

#[rstest]
#[actix_web::test]
async fn publish_returns_created_window() {
    let caller = doctor("Grey", "Surgeon");
    let caller_id = caller.id;
    let published = window(caller_id);
    let published_id = published.id().to_string();
    let mut mocks = StateMocks::new().signed_in(&caller);
    mocks
        .availability
        .expect_publish()
        .withf(move |request| {
            request.doctor_id == caller_id
                && request.start == NaiveTime::from_hms_opt(9, 0, 0).expect("time")
        })
        .return_once(move |_| Ok(published));

    let (status, body) = send(
        mocks,
        test::TestRequest::post()
            .uri("/api/v1/doctor/availability")
            .insert_header((USER_ID_HEADER, caller_id.to_string()))
            .set_json(json!({ "date": "2030-01-02", "startTime": "09:00", "endTime": "12:00" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({ "id": published_id, "date": "2030-01-02", "startTime": "09:00", "endTime": "12:00" })
    );
}

#[rstest]
#[actix_web::test]
async fn publish_surfaces_validation_refusals() {
    let caller = doctor("Grey", "Surgeon");
    let mut mocks = StateMocks::new().signed_in(&caller);
    mocks.availability.expect_publish().return_once(|_| {
        Err(BookingError::Rejected(Rejection::validation(
            "End time must be after start time.",
        )))
    });

    let (status, body) = send(
        mocks,
        test::TestRequest::post()
            .uri("/api/v1/doctor/availability")
            .insert_header((USER_ID_HEADER, caller.id.to_string()))
            .set_json(json!({ "date": "2030-01-02", "startTime": "12:00", "endTime": "09:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["reason"], "validation");
}

#[rstest]
#[actix_web::test]
async fn publish_requires_every_field() {
    let caller = doctor("Grey", "Surgeon");
    let (status, body) = send(
        StateMocks::new().signed_in(&caller),
        test::TestRequest::post()
            .uri("/api/v1/doctor/availability")
            .insert_header((USER_ID_HEADER, caller.id.to_string()))
            .set_json(json!({ "date": "2030-01-02", "startTime": "09:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "endTime");
}

#[rstest]
#[actix_web::test]
async fn clients_cannot_manage_availability() {
    let caller = client("Casey");
    let (status, body) = send(
        StateMocks::new().signed_in(&caller),
        test::TestRequest::get()
            .uri("/api/v1/doctor/availability")
            .insert_header((USER_ID_HEADER, caller.id.to_string())),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Access denied.");
}

#[rstest]
#[actix_web::test]
async fn list_returns_own_windows() {
    let caller = doctor("Grey", "Surgeon");
    let caller_id = caller.id;
    let own = window(caller_id);
    let mut mocks = StateMocks::new().signed_in(&caller);
    mocks
        .availability
        .expect_list_own()
        .withf(move |id| *id == caller_id)
        .return_once(move |_| Ok(vec![own]));

    let (status, body) = send(
        mocks,
        test::TestRequest::get()
            .uri("/api/v1/doctor/availability")
            .insert_header((USER_ID_HEADER, caller_id.to_string())),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["startTime"], "09:00");
}

#[rstest]
#[case(Ok(()), StatusCode::NO_CONTENT)]
#[case(Err(BookingError::Rejected(Rejection::unauthorized("Unauthorized"))), StatusCode::FORBIDDEN)]
#[case(Err(BookingError::Rejected(Rejection::not_found("Availability not found."))), StatusCode::NOT_FOUND)]
#[actix_web::test]
async fn withdraw_maps_outcomes(
    #[case] outcome: Result<(), BookingError>,
    #[case] expected: StatusCode,
) {
    let caller = doctor("Grey", "Surgeon");
    let target = AvailabilityId::random();
    let mut mocks = StateMocks::new().signed_in(&caller);
    mocks
        .availability
        .expect_withdraw()
        .withf(move |id, _| *id == target)
        .return_once(move |_, _| outcome);

    let (status, _) = send(
        mocks,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/doctor/availability/{target}"))
            .insert_header((USER_ID_HEADER, caller.id.to_string())),
    )
    .await;
    assert_eq!(status, expected);
}
