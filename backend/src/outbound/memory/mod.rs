//! In-process booking store.
//!
//! [`InMemoryBookingStore`] implements the account, availability,
//! reservation and revocation repositories over one mutex-guarded state. The
//! reservation uniqueness checks and the insert happen under the same lock,
//! as does the whole revocation cascade, which gives the same guarantees as
//! the database's unique indexes and transactions. Used when no
//! database URL is configured and throughout the test suites.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, AvailabilityRepository,
    AvailabilityRepositoryError, DoctorRevocationError, DoctorRevocationRepository,
    ReservationRepository, ReservationRepositoryError, RevokedSchedule,
};
use crate::domain::{
    Account, AvailabilityId, AvailabilityWindow, Reservation, ReservationId, Role, Specialization,
    UserId,
};

mod demo;

pub use demo::{DEMO_ADMIN_ID, DEMO_CLIENT_ID, DEMO_DOCTOR_ID, demo_accounts};

#[derive(Default)]
struct StoreState {
    accounts: HashMap<UserId, Account>,
    windows: Vec<AvailabilityWindow>,
    reservations: Vec<Reservation>,
}

/// Mutex-guarded store implementing the persistence ports.
#[derive(Default)]
pub struct InMemoryBookingStore {
    state: Mutex<StoreState>,
}

const POISONED: &str = "in-memory store lock poisoned";

impl InMemoryBookingStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with accounts.
    pub fn with_accounts(accounts: impl IntoIterator<Item = Account>) -> Self {
        let state = StoreState {
            accounts: accounts.into_iter().map(|a| (a.id, a)).collect(),
            ..StoreState::default()
        };
        Self {
            state: Mutex::new(state),
        }
    }

    /// Add or replace an account. Returns `false` if the lock is poisoned.
    pub fn upsert_account(&self, account: Account) -> bool {
        self.state
            .lock()
            .map(|mut state| {
                state.accounts.insert(account.id, account);
            })
            .is_ok()
    }

    fn lock(&self) -> Option<MutexGuard<'_, StoreState>> {
        self.state.lock().ok()
    }
}

fn sort_windows(windows: &mut [AvailabilityWindow]) {
    windows.sort_by_key(|w| (w.date(), w.start()));
}

fn sort_reservations(reservations: &mut [Reservation]) {
    reservations.sort_by_key(|r| (r.date, r.time));
}

#[async_trait]
impl AccountRepository for InMemoryBookingStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<Account>, AccountRepositoryError> {
        let state = self
            .lock()
            .ok_or_else(|| AccountRepositoryError::connection(POISONED))?;
        Ok(state.accounts.get(id).cloned())
    }

    async fn update_role(
        &self,
        id: &UserId,
        role: Role,
        specialization: Option<Specialization>,
    ) -> Result<bool, AccountRepositoryError> {
        let mut state = self
            .lock()
            .ok_or_else(|| AccountRepositoryError::connection(POISONED))?;
        Ok(state
            .accounts
            .get_mut(id)
            .map(|account| {
                account.role = role;
                account.specialization = specialization;
            })
            .is_some())
    }

    async fn list_doctors_with_availability(&self) -> Result<Vec<Account>, AccountRepositoryError> {
        let state = self
            .lock()
            .ok_or_else(|| AccountRepositoryError::connection(POISONED))?;
        let mut doctors: Vec<Account> = state
            .accounts
            .values()
            .filter(|a| a.is_doctor())
            .filter(|a| state.windows.iter().any(|w| w.doctor_id() == a.id))
            .cloned()
            .collect();
        doctors.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(doctors)
    }
}

#[async_trait]
impl AvailabilityRepository for InMemoryBookingStore {
    async fn insert(&self, window: &AvailabilityWindow) -> Result<(), AvailabilityRepositoryError> {
        let mut state = self
            .lock()
            .ok_or_else(|| AvailabilityRepositoryError::connection(POISONED))?;
        state.windows.push(window.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &AvailabilityId,
    ) -> Result<Option<AvailabilityWindow>, AvailabilityRepositoryError> {
        let state = self
            .lock()
            .ok_or_else(|| AvailabilityRepositoryError::connection(POISONED))?;
        Ok(state.windows.iter().find(|w| w.id() == *id).cloned())
    }

    async fn delete(&self, id: &AvailabilityId) -> Result<bool, AvailabilityRepositoryError> {
        let mut state = self
            .lock()
            .ok_or_else(|| AvailabilityRepositoryError::connection(POISONED))?;
        let before = state.windows.len();
        state.windows.retain(|w| w.id() != *id);
        Ok(state.windows.len() < before)
    }

    async fn list_for_doctor(
        &self,
        doctor_id: &UserId,
        from: NaiveDate,
    ) -> Result<Vec<AvailabilityWindow>, AvailabilityRepositoryError> {
        let state = self
            .lock()
            .ok_or_else(|| AvailabilityRepositoryError::connection(POISONED))?;
        let mut windows: Vec<_> = state
            .windows
            .iter()
            .filter(|w| w.doctor_id() == *doctor_id && w.date() >= from)
            .cloned()
            .collect();
        sort_windows(&mut windows);
        Ok(windows)
    }

    async fn list_for_doctor_on(
        &self,
        doctor_id: &UserId,
        date: NaiveDate,
    ) -> Result<Vec<AvailabilityWindow>, AvailabilityRepositoryError> {
        let state = self
            .lock()
            .ok_or_else(|| AvailabilityRepositoryError::connection(POISONED))?;
        let mut windows: Vec<_> = state
            .windows
            .iter()
            .filter(|w| w.doctor_id() == *doctor_id && w.date() == date)
            .cloned()
            .collect();
        sort_windows(&mut windows);
        Ok(windows)
    }
}

#[async_trait]
impl ReservationRepository for InMemoryBookingStore {
    async fn insert(&self, reservation: &Reservation) -> Result<(), ReservationRepositoryError> {
        let mut state = self
            .lock()
            .ok_or_else(|| ReservationRepositoryError::connection(POISONED))?;
        let existing = &state.reservations;
        if existing
            .iter()
            .any(|r| r.occupies(reservation.doctor_id, reservation.date, reservation.time))
        {
            return Err(ReservationRepositoryError::slot_conflict());
        }
        if existing.iter().any(|r| {
            r.books_client_on(reservation.doctor_id, reservation.client_id, reservation.date)
        }) {
            return Err(ReservationRepositoryError::duplicate_client_booking());
        }
        state.reservations.push(reservation.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &ReservationId,
    ) -> Result<Option<Reservation>, ReservationRepositoryError> {
        let state = self
            .lock()
            .ok_or_else(|| ReservationRepositoryError::connection(POISONED))?;
        Ok(state.reservations.iter().find(|r| r.id == *id).cloned())
    }

    async fn delete(&self, id: &ReservationId) -> Result<bool, ReservationRepositoryError> {
        let mut state = self
            .lock()
            .ok_or_else(|| ReservationRepositoryError::connection(POISONED))?;
        let before = state.reservations.len();
        state.reservations.retain(|r| r.id != *id);
        Ok(state.reservations.len() < before)
    }

    async fn list_for_doctor(
        &self,
        doctor_id: &UserId,
        from: NaiveDate,
    ) -> Result<Vec<Reservation>, ReservationRepositoryError> {
        let state = self
            .lock()
            .ok_or_else(|| ReservationRepositoryError::connection(POISONED))?;
        let mut reservations: Vec<_> = state
            .reservations
            .iter()
            .filter(|r| r.doctor_id == *doctor_id && r.date >= from)
            .cloned()
            .collect();
        sort_reservations(&mut reservations);
        Ok(reservations)
    }

    async fn list_for_doctor_on(
        &self,
        doctor_id: &UserId,
        date: NaiveDate,
    ) -> Result<Vec<Reservation>, ReservationRepositoryError> {
        let state = self
            .lock()
            .ok_or_else(|| ReservationRepositoryError::connection(POISONED))?;
        let mut reservations: Vec<_> = state
            .reservations
            .iter()
            .filter(|r| r.doctor_id == *doctor_id && r.date == date)
            .cloned()
            .collect();
        sort_reservations(&mut reservations);
        Ok(reservations)
    }

    async fn list_for_client(
        &self,
        client_id: &UserId,
    ) -> Result<Vec<Reservation>, ReservationRepositoryError> {
        let state = self
            .lock()
            .ok_or_else(|| ReservationRepositoryError::connection(POISONED))?;
        let mut reservations: Vec<_> = state
            .reservations
            .iter()
            .filter(|r| r.client_id == *client_id)
            .cloned()
            .collect();
        sort_reservations(&mut reservations);
        Ok(reservations)
    }
}

#[async_trait]
impl DoctorRevocationRepository for InMemoryBookingStore {
    async fn revoke_doctor(
        &self,
        doctor_id: &UserId,
    ) -> Result<Option<RevokedSchedule>, DoctorRevocationError> {
        let mut state = self
            .lock()
            .ok_or_else(|| DoctorRevocationError::connection(POISONED))?;
        let Some(account) = state
            .accounts
            .get_mut(doctor_id)
            .filter(|account| account.is_doctor())
        else {
            return Ok(None);
        };
        account.role = Role::Client;
        account.specialization = None;

        let windows_before = state.windows.len();
        state.windows.retain(|w| w.doctor_id() != *doctor_id);
        let deleted_windows = windows_before - state.windows.len();
        let (deleted_reservations, kept): (Vec<_>, Vec<_>) = state
            .reservations
            .drain(..)
            .partition(|r| r.doctor_id == *doctor_id);
        state.reservations = kept;
        Ok(Some(RevokedSchedule {
            deleted_availability_count: u64::try_from(deleted_windows).unwrap_or(u64::MAX),
            deleted_reservations,
        }))
    }
}
