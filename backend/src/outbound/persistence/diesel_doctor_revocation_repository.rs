//! PostgreSQL-backed [`DoctorRevocationRepository`].
//!
//! The demotion and both deletes run in one transaction. The demotion is
//! conditional on the account still holding the doctor role, so two
//! concurrent revocations cannot both report a cascade.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{DoctorRevocationError, DoctorRevocationRepository, RevokedSchedule};
use crate::domain::{Reservation, Role, UserId};

use super::error_mapping::{map_basic, map_pool};
use super::models::ReservationRow;
use super::pool::{DbPool, PoolError};
use super::schema::{accounts, availability_windows, reservations};

/// Diesel implementation of the revocation cascade.
#[derive(Clone)]
pub struct DieselDoctorRevocationRepository {
    pool: DbPool,
}

impl DieselDoctorRevocationRepository {
    /// Create a repository over the shared connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> DoctorRevocationError {
    map_pool(error, DoctorRevocationError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> DoctorRevocationError {
    map_basic(
        error,
        DoctorRevocationError::query,
        DoctorRevocationError::connection,
    )
}

#[async_trait]
impl DoctorRevocationRepository for DieselDoctorRevocationRepository {
    async fn revoke_doctor(
        &self,
        doctor_id: &UserId,
    ) -> Result<Option<RevokedSchedule>, DoctorRevocationError> {
        let doctor = *doctor_id.as_uuid();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                let demoted = diesel::update(
                    accounts::table
                        .filter(accounts::id.eq(doctor))
                        .filter(accounts::role.eq(Role::Doctor.as_str())),
                )
                .set((
                    accounts::role.eq(Role::Client.as_str()),
                    accounts::specialization.eq(None::<String>),
                ))
                .execute(conn)
                .await?;
                if demoted == 0 {
                    return Ok(None);
                }

                let deleted_windows = diesel::delete(
                    availability_windows::table.filter(availability_windows::doctor_id.eq(doctor)),
                )
                .execute(conn)
                .await?;
                let rows: Vec<ReservationRow> =
                    diesel::delete(reservations::table.filter(reservations::doctor_id.eq(doctor)))
                        .returning(ReservationRow::as_returning())
                        .get_results(conn)
                        .await?;

                Ok(Some(RevokedSchedule {
                    deleted_availability_count: u64::try_from(deleted_windows)
                        .unwrap_or(u64::MAX),
                    deleted_reservations: rows.into_iter().map(Reservation::from).collect(),
                }))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
