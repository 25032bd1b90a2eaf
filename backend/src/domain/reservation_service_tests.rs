//! Unit tests for the reservation lifecycle.

use chrono::NaiveDate;
use rstest::rstest;

use super::*;
use crate::domain::ports::{
    NotificationDispatchError, ReservationRepositoryError, ScheduleCacheError,
};
use crate::domain::service_test_harness::{PortMocks, at, days_from_today, today};
use crate::domain::{
    Account, AvailabilityId, AvailabilityWindow, BookingError, ErrorCode, RejectionReason,
};
use crate::test_support;

struct Booking {
    doctor: Account,
    client: UserId,
    date: NaiveDate,
}

impl Booking {
    fn new() -> Self {
        Self {
            doctor: test_support::doctor("James Wilson", "Oncologist"),
            client: UserId::random(),
            date: days_from_today(2),
        }
    }

    fn request(&self, time: chrono::NaiveTime) -> BookingRequest {
        BookingRequest {
            doctor_id: self.doctor.id,
            client_id: self.client,
            date: self.date,
            time,
        }
    }

    /// Doctor lookup plus a 09:00-11:00 window and no reservations.
    fn open_day(&self, mocks: &mut PortMocks) {
        let doctor = self.doctor.clone();
        let window = AvailabilityWindow::new(
            AvailabilityId::random(),
            self.doctor.id,
            self.date,
            at(9, 0),
            at(11, 0),
        )
        .expect("ordered window");
        mocks
            .accounts
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(doctor)));
        mocks
            .availability
            .expect_list_for_doctor_on()
            .return_once(move |_, _| Ok(vec![window]));
        mocks
            .reservations
            .expect_list_for_doctor_on()
            .return_once(|_, _| Ok(Vec::new()));
    }
}

#[tokio::test]
async fn create_persists_invalidates_and_notifies() {
    let booking = Booking::new();
    let client = booking.client;
    let doctor_id = booking.doctor.id;
    let mut mocks = PortMocks::new();
    booking.open_day(&mut mocks);
    mocks
        .reservations
        .expect_insert()
        .withf(move |r| r.client_id == client && r.time == at(9, 30))
        .times(1)
        .returning(|_| Ok(()));
    mocks
        .cache
        .expect_invalidate()
        .withf(move |key| key.as_str().starts_with(&format!("doctor_{doctor_id}_")))
        .times(2)
        .returning(|_| Ok(()));
    mocks
        .notifier
        .expect_dispatch()
        .withf(move |n| {
            n.recipient == client
                && n.event.message().contains("Dr. James Wilson (Oncologist)")
                && n.event.message().contains("at 09:30")
        })
        .times(1)
        .returning(|_| Ok(()));
    let service = ReservationService::new(mocks.into_ports());

    let reservation = service
        .create(booking.request(at(9, 30)))
        .await
        .expect("booking accepted");

    assert_eq!(reservation.doctor_id, doctor_id);
    assert_eq!(reservation.created_at.date_naive(), today());
}

#[tokio::test]
async fn rejected_booking_has_no_side_effects() {
    let booking = Booking::new();
    let mut mocks = PortMocks::new();
    booking.open_day(&mut mocks);
    mocks.reservations.expect_insert().never();
    mocks.cache.expect_invalidate().never();
    mocks.notifier.expect_dispatch().never();
    let service = ReservationService::new(mocks.into_ports());

    let err = service
        .create(booking.request(at(13, 0)))
        .await
        .expect_err("outside window");

    assert_eq!(err.reason(), Some(RejectionReason::NotAvailable));
}

#[rstest]
#[case(ReservationRepositoryError::slot_conflict(), RejectionReason::SlotTaken)]
#[case(
    ReservationRepositoryError::duplicate_client_booking(),
    RejectionReason::DuplicateByClient
)]
#[tokio::test]
async fn insert_races_become_rejections(
    #[case] clash: ReservationRepositoryError,
    #[case] expected: RejectionReason,
) {
    let booking = Booking::new();
    let mut mocks = PortMocks::new();
    booking.open_day(&mut mocks);
    mocks
        .reservations
        .expect_insert()
        .return_once(move |_| Err(clash));
    mocks.cache.expect_invalidate().never();
    mocks.notifier.expect_dispatch().never();
    let service = ReservationService::new(mocks.into_ports());

    let err = service
        .create(booking.request(at(10, 0)))
        .await
        .expect_err("lost the race");

    assert_eq!(err.reason(), Some(expected));
}

#[tokio::test]
async fn unknown_doctor_is_not_found() {
    let booking = Booking::new();
    let mut mocks = PortMocks::new();
    mocks.accounts.expect_find_by_id().return_once(|_| Ok(None));
    let service = ReservationService::new(mocks.into_ports());

    let err = service
        .create(booking.request(at(10, 0)))
        .await
        .expect_err("no such doctor");

    assert_eq!(err.reason(), Some(RejectionReason::NotFound));
}

#[tokio::test]
async fn delivery_and_cache_failures_do_not_undo_a_booking() {
    let booking = Booking::new();
    let mut mocks = PortMocks::new();
    booking.open_day(&mut mocks);
    mocks.reservations.expect_insert().returning(|_| Ok(()));
    mocks
        .cache
        .expect_invalidate()
        .returning(|_| Err(ScheduleCacheError::backend("timeout")));
    mocks
        .notifier
        .expect_dispatch()
        .returning(|_| Err(NotificationDispatchError::delivery("mailbox full")));
    let service = ReservationService::new(mocks.into_ports());

    let result = service.create(booking.request(at(9, 0))).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn cancel_by_owner_deletes_and_invalidates() {
    let booking = Booking::new();
    let reservation = Reservation::confirm(booking.request(at(9, 0)), chrono::Utc::now());
    let id = reservation.id;
    let mut mocks = PortMocks::new();
    mocks
        .reservations
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(reservation)));
    mocks
        .reservations
        .expect_delete()
        .withf(move |candidate| *candidate == id)
        .times(1)
        .return_once(|_| Ok(true));
    mocks
        .cache
        .expect_invalidate()
        .times(2)
        .returning(|_| Ok(()));
    mocks.notifier.expect_dispatch().never();
    let service = ReservationService::new(mocks.into_ports());

    service.cancel(&id, &booking.client).await.expect("cancelled");
}

#[tokio::test]
async fn cancel_by_stranger_leaves_reservation_untouched() {
    let booking = Booking::new();
    let reservation = Reservation::confirm(booking.request(at(9, 0)), chrono::Utc::now());
    let id = reservation.id;
    let mut mocks = PortMocks::new();
    mocks
        .reservations
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(reservation)));
    mocks.reservations.expect_delete().never();
    mocks.cache.expect_invalidate().never();
    let service = ReservationService::new(mocks.into_ports());

    let err = service
        .cancel(&id, &UserId::random())
        .await
        .expect_err("not the owner");

    assert_eq!(err.reason(), Some(RejectionReason::Unauthorized));
    assert_eq!(err.to_string(), "Unauthorized");
}

#[tokio::test]
async fn cancel_missing_reservation_is_not_found() {
    let mut mocks = PortMocks::new();
    mocks
        .reservations
        .expect_find_by_id()
        .return_once(|_| Ok(None));
    let service = ReservationService::new(mocks.into_ports());

    let err = service
        .cancel(&ReservationId::random(), &UserId::random())
        .await
        .expect_err("missing");

    assert_eq!(err.reason(), Some(RejectionReason::NotFound));
}

#[tokio::test]
async fn list_for_client_surfaces_outages() {
    let mut mocks = PortMocks::new();
    mocks
        .reservations
        .expect_list_for_client()
        .return_once(|_| Err(ReservationRepositoryError::connection("refused")));
    let service = ReservationService::new(mocks.into_ports());

    let err = service
        .list_for_client(&UserId::random())
        .await
        .expect_err("store down");

    assert!(matches!(err, BookingError::Failed(ref e) if e.code() == ErrorCode::ServiceUnavailable));
}
