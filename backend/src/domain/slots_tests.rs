//! Tests for slot derivation.

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::{AvailabilityId, BookingRequest, Reservation, UserId};

fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).expect("valid time")
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 3, day).expect("valid date")
}

#[fixture]
fn doctor() -> UserId {
    UserId::random()
}

fn window(doctor: UserId, day: u32, start: NaiveTime, end: NaiveTime) -> AvailabilityWindow {
    AvailabilityWindow::new(AvailabilityId::random(), doctor, date(day), start, end)
        .expect("ordered window")
}

fn booked(doctor: UserId, day: u32, time: NaiveTime) -> Reservation {
    Reservation::confirm(
        BookingRequest {
            doctor_id: doctor,
            client_id: UserId::random(),
            date: date(day),
            time,
        },
        Utc.with_ymd_and_hms(2030, 3, 1, 8, 0, 0).single().expect("valid instant"),
    )
}

#[rstest]
#[case(at(9, 0), at(10, 0), vec![at(9, 0), at(9, 30)])]
#[case(at(9, 0), at(9, 45), vec![at(9, 0), at(9, 30)])]
#[case(at(9, 0), at(9, 10), vec![at(9, 0)])]
#[case(at(23, 30), at(23, 59), vec![at(23, 30)])]
fn candidates_stop_strictly_before_end(
    doctor: UserId,
    #[case] start: NaiveTime,
    #[case] end: NaiveTime,
    #[case] expected: Vec<NaiveTime>,
) {
    assert_eq!(window_slots(&window(doctor, 5, start, end)), expected);
}

#[rstest]
fn subtracts_reserved_times(doctor: UserId) {
    let windows = [window(doctor, 5, at(9, 0), at(11, 0))];
    let reservations = [booked(doctor, 5, at(9, 30))];

    let slots = derive_slot_set(&windows, &reservations, date(1));

    assert_eq!(slots.on(date(5)), Some([at(9, 0), at(10, 0), at(10, 30)].as_slice()));
    assert!(!slots.contains(date(5), at(9, 30)));
}

#[rstest]
fn concatenates_same_day_windows_without_dedupe(doctor: UserId) {
    let windows = [
        window(doctor, 5, at(14, 0), at(15, 0)),
        window(doctor, 5, at(9, 0), at(10, 0)),
        window(doctor, 5, at(9, 30), at(10, 0)),
    ];

    let slots = derive_slot_set(&windows, &[], date(1));

    assert_eq!(
        slots.on(date(5)),
        Some([at(14, 0), at(14, 30), at(9, 0), at(9, 30), at(9, 30)].as_slice())
    );
}

#[rstest]
fn drops_dates_before_the_horizon(doctor: UserId) {
    let windows = [
        window(doctor, 4, at(9, 0), at(10, 0)),
        window(doctor, 6, at(9, 0), at(10, 0)),
    ];
    let reservations = [booked(doctor, 4, at(9, 0))];

    let slots = derive_slot_set(&windows, &reservations, date(5));

    assert_eq!(slots.dates().collect::<Vec<_>>(), vec![date(6)]);
}

#[rstest]
fn fully_booked_dates_stay_indexed(doctor: UserId) {
    let windows = [window(doctor, 5, at(9, 0), at(9, 30))];
    let reservations = [booked(doctor, 5, at(9, 0))];

    let slots = derive_slot_set(&windows, &reservations, date(1));

    assert_eq!(slots.on(date(5)), Some(Vec::<NaiveTime>::new().as_slice()));
}

#[rstest]
fn reservation_only_dates_are_indexed_empty(doctor: UserId) {
    let reservations = [booked(doctor, 7, at(12, 0))];

    let slots = derive_slot_set(&[], &reservations, date(1));

    assert_eq!(slots.on(date(7)), Some(Vec::<NaiveTime>::new().as_slice()));
}

#[rstest]
fn derivation_is_repeatable(doctor: UserId) {
    let windows = [window(doctor, 5, at(9, 0), at(12, 0))];
    let reservations = [booked(doctor, 5, at(10, 0))];

    let first = derive_slot_set(&windows, &reservations, date(1));
    let second = derive_slot_set(&windows, &reservations, date(1));

    assert_eq!(first, second);
}

#[rstest]
fn reserved_times_are_sorted_per_date(doctor: UserId) {
    let reservations = [
        booked(doctor, 5, at(11, 0)),
        booked(doctor, 5, at(9, 0)),
        booked(doctor, 2, at(9, 0)),
    ];

    let reserved = reserved_times(&reservations, date(3));

    assert_eq!(reserved.len(), 1);
    assert_eq!(reserved.get(&date(5)), Some(&vec![at(9, 0), at(11, 0)]));
}
