//! PostgreSQL-backed [`ReservationRepository`].
//!
//! Slot and same-day uniqueness are enforced by unique indexes; violations
//! are reported as the matching port error so the service can answer with a
//! business refusal.

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ReservationRepository, ReservationRepositoryError};
use crate::domain::{Reservation, ReservationId, UserId};

use super::error_mapping::{DieselFailure, classify, map_pool};
use super::models::ReservationRow;
use super::pool::{DbPool, PoolError};
use super::schema::reservations;

/// Unique index over `(doctor_id, reservation_date, reservation_time)`.
pub(crate) const SLOT_CONSTRAINT: &str = "reservations_doctor_slot_key";
/// Unique index over `(doctor_id, client_id, reservation_date)`.
pub(crate) const CLIENT_DAY_CONSTRAINT: &str = "reservations_doctor_client_day_key";

/// Diesel implementation of reservation storage.
#[derive(Clone)]
pub struct DieselReservationRepository {
    pool: DbPool,
}

impl DieselReservationRepository {
    /// Create a repository over the shared connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ReservationRepositoryError {
    map_pool(error, ReservationRepositoryError::connection)
}

fn map_failure(failure: DieselFailure) -> ReservationRepositoryError {
    match failure {
        DieselFailure::Connection(message) => ReservationRepositoryError::connection(message),
        DieselFailure::Query(message) => ReservationRepositoryError::query(message),
        DieselFailure::Unique(Some(name)) if name == CLIENT_DAY_CONSTRAINT => {
            ReservationRepositoryError::DuplicateClientBooking
        }
        // The slot index is the only other unique constraint on the table.
        DieselFailure::Unique(_) => ReservationRepositoryError::SlotConflict,
    }
}

fn map_diesel_error(error: diesel::result::Error) -> ReservationRepositoryError {
    map_failure(classify(error))
}

impl From<ReservationRow> for Reservation {
    fn from(row: ReservationRow) -> Self {
        Self {
            id: ReservationId::from_uuid(row.id),
            doctor_id: UserId::from_uuid(row.doctor_id),
            client_id: UserId::from_uuid(row.client_id),
            date: row.reservation_date,
            time: row.reservation_time,
            created_at: row.created_at,
        }
    }
}

impl From<&Reservation> for ReservationRow {
    fn from(reservation: &Reservation) -> Self {
        Self {
            id: *reservation.id.as_uuid(),
            doctor_id: *reservation.doctor_id.as_uuid(),
            client_id: *reservation.client_id.as_uuid(),
            reservation_date: reservation.date,
            reservation_time: reservation.time,
            created_at: reservation.created_at,
        }
    }
}

fn into_reservations(rows: Vec<ReservationRow>) -> Vec<Reservation> {
    rows.into_iter().map(Reservation::from).collect()
}

#[async_trait]
impl ReservationRepository for DieselReservationRepository {
    async fn insert(&self, reservation: &Reservation) -> Result<(), ReservationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(reservations::table)
            .values(ReservationRow::from(reservation))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &ReservationId,
    ) -> Result<Option<Reservation>, ReservationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = reservations::table
            .filter(reservations::id.eq(id.as_uuid()))
            .select(ReservationRow::as_select())
            .first::<ReservationRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Reservation::from))
    }

    async fn delete(&self, id: &ReservationId) -> Result<bool, ReservationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(reservations::table.filter(reservations::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn list_for_doctor(
        &self,
        doctor_id: &UserId,
        from: NaiveDate,
    ) -> Result<Vec<Reservation>, ReservationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ReservationRow> = reservations::table
            .filter(reservations::doctor_id.eq(doctor_id.as_uuid()))
            .filter(reservations::reservation_date.ge(from))
            .order((
                reservations::reservation_date.asc(),
                reservations::reservation_time.asc(),
            ))
            .select(ReservationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(into_reservations(rows))
    }

    async fn list_for_doctor_on(
        &self,
        doctor_id: &UserId,
        date: NaiveDate,
    ) -> Result<Vec<Reservation>, ReservationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ReservationRow> = reservations::table
            .filter(reservations::doctor_id.eq(doctor_id.as_uuid()))
            .filter(reservations::reservation_date.eq(date))
            .order(reservations::reservation_time.asc())
            .select(ReservationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(into_reservations(rows))
    }

    async fn list_for_client(
        &self,
        client_id: &UserId,
    ) -> Result<Vec<Reservation>, ReservationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ReservationRow> = reservations::table
            .filter(reservations::client_id.eq(client_id.as_uuid()))
            .order((
                reservations::reservation_date.asc(),
                reservations::reservation_time.asc(),
            ))
            .select(ReservationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(into_reservations(rows))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Some(SLOT_CONSTRAINT), ReservationRepositoryError::SlotConflict)]
    #[case(Some(CLIENT_DAY_CONSTRAINT), ReservationRepositoryError::DuplicateClientBooking)]
    #[case(None, ReservationRepositoryError::SlotConflict)]
    fn unique_violations_map_to_booking_conflicts(
        #[case] constraint: Option<&str>,
        #[case] expected: ReservationRepositoryError,
    ) {
        let mapped = map_failure(DieselFailure::Unique(constraint.map(str::to_owned)));
        assert_eq!(mapped, expected);
    }

    #[rstest]
    fn connection_failures_stay_connection_failures() {
        let mapped = map_failure(DieselFailure::Connection("database connection error"));
        assert!(matches!(mapped, ReservationRepositoryError::Connection { .. }));
    }
}
