//! PostgreSQL-backed [`AccountRepository`].

use std::str::FromStr;

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AccountRepository, AccountRepositoryError};
use crate::domain::{Account, Role, Specialization, UserId};

use super::error_mapping::{map_basic, map_pool};
use super::models::AccountRow;
use super::pool::{DbPool, PoolError};
use super::schema::{accounts, availability_windows};

/// Diesel implementation of the account directory.
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    /// Create a repository over the shared connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AccountRepositoryError {
    map_pool(error, AccountRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> AccountRepositoryError {
    map_basic(
        error,
        AccountRepositoryError::query,
        AccountRepositoryError::connection,
    )
}

fn row_to_account(row: AccountRow) -> Result<Account, AccountRepositoryError> {
    let role = Role::from_str(&row.role)
        .map_err(|err| AccountRepositoryError::corrupt(format!("{}: {err}", row.id)))?;
    let specialization = row
        .specialization
        .map(Specialization::new)
        .transpose()
        .map_err(|err| AccountRepositoryError::corrupt(format!("{}: {err}", row.id)))?;
    Ok(Account {
        id: UserId::from_uuid(row.id),
        name: row.display_name,
        email: row.email,
        role,
        specialization,
    })
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<Account>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = accounts::table
            .filter(accounts::id.eq(id.as_uuid()))
            .select(AccountRow::as_select())
            .first::<AccountRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_account).transpose()
    }

    async fn update_role(
        &self,
        id: &UserId,
        role: Role,
        specialization: Option<Specialization>,
    ) -> Result<bool, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(accounts::table.filter(accounts::id.eq(id.as_uuid())))
            .set((
                accounts::role.eq(role.as_str()),
                accounts::specialization.eq(specialization.as_ref().map(Specialization::as_str)),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn list_doctors_with_availability(&self) -> Result<Vec<Account>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let has_window = exists(
            availability_windows::table.filter(availability_windows::doctor_id.eq(accounts::id)),
        );
        let rows: Vec<AccountRow> = accounts::table
            .filter(accounts::role.eq(Role::Doctor.as_str()))
            .filter(has_window)
            .order((accounts::display_name.asc(), accounts::id.asc()))
            .select(AccountRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_account).collect()
    }
}
