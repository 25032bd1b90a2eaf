//! PostgreSQL-backed [`AvailabilityRepository`].

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{AvailabilityRepository, AvailabilityRepositoryError};
use crate::domain::{AvailabilityId, AvailabilityWindow, UserId};

use super::error_mapping::{map_basic, map_pool};
use super::models::{AvailabilityRow, NewAvailabilityRow};
use super::pool::{DbPool, PoolError};
use super::schema::availability_windows;

/// Diesel implementation of availability storage.
#[derive(Clone)]
pub struct DieselAvailabilityRepository {
    pool: DbPool,
}

impl DieselAvailabilityRepository {
    /// Create a repository over the shared connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AvailabilityRepositoryError {
    map_pool(error, AvailabilityRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> AvailabilityRepositoryError {
    map_basic(
        error,
        AvailabilityRepositoryError::query,
        AvailabilityRepositoryError::connection,
    )
}

fn row_to_window(row: AvailabilityRow) -> Result<AvailabilityWindow, AvailabilityRepositoryError> {
    AvailabilityWindow::new(
        AvailabilityId::from_uuid(row.id),
        UserId::from_uuid(row.doctor_id),
        row.available_date,
        row.start_time,
        row.end_time,
    )
    .map_err(|err| {
        warn!(id = %row.id, error = %err, "stored availability window is inverted");
        AvailabilityRepositoryError::query(err.to_string())
    })
}

fn rows_to_windows(
    rows: Vec<AvailabilityRow>,
) -> Result<Vec<AvailabilityWindow>, AvailabilityRepositoryError> {
    rows.into_iter().map(row_to_window).collect()
}

#[async_trait]
impl AvailabilityRepository for DieselAvailabilityRepository {
    async fn insert(&self, window: &AvailabilityWindow) -> Result<(), AvailabilityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewAvailabilityRow {
            id: *window.id().as_uuid(),
            doctor_id: *window.doctor_id().as_uuid(),
            available_date: window.date(),
            start_time: window.start(),
            end_time: window.end(),
        };
        diesel::insert_into(availability_windows::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &AvailabilityId,
    ) -> Result<Option<AvailabilityWindow>, AvailabilityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = availability_windows::table
            .filter(availability_windows::id.eq(id.as_uuid()))
            .select(AvailabilityRow::as_select())
            .first::<AvailabilityRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_window).transpose()
    }

    async fn delete(&self, id: &AvailabilityId) -> Result<bool, AvailabilityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            availability_windows::table.filter(availability_windows::id.eq(id.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn list_for_doctor(
        &self,
        doctor_id: &UserId,
        from: NaiveDate,
    ) -> Result<Vec<AvailabilityWindow>, AvailabilityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<AvailabilityRow> = availability_windows::table
            .filter(availability_windows::doctor_id.eq(doctor_id.as_uuid()))
            .filter(availability_windows::available_date.ge(from))
            .order((
                availability_windows::available_date.asc(),
                availability_windows::start_time.asc(),
            ))
            .select(AvailabilityRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_windows(rows)
    }

    async fn list_for_doctor_on(
        &self,
        doctor_id: &UserId,
        date: NaiveDate,
    ) -> Result<Vec<AvailabilityWindow>, AvailabilityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<AvailabilityRow> = availability_windows::table
            .filter(availability_windows::doctor_id.eq(doctor_id.as_uuid()))
            .filter(availability_windows::available_date.eq(date))
            .order(availability_windows::start_time.asc())
            .select(AvailabilityRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_windows(rows)
    }
}
