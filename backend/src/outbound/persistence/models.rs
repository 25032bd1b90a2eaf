//! Diesel row structs. Internal to the persistence adapters.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{accounts, availability_windows, notifications, reservations};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccountRow {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub role: String,
    pub specialization: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = availability_windows)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AvailabilityRow {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub available_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = availability_windows)]
pub(crate) struct NewAvailabilityRow {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub available_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = reservations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReservationRow {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub client_id: Uuid,
    pub reservation_date: NaiveDate,
    pub reservation_time: NaiveTime,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notifications)]
pub(crate) struct NewNotificationRow<'a> {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub kind: &'a str,
    pub payload: serde_json::Value,
    pub message: String,
}
