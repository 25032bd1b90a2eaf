//! Read-side schedule service and doctor availability management.
//!
//! Calendars and availability listings are cached per doctor under the
//! [`ScheduleView`] keys. Every cached payload records the date it was
//! derived from, so an entry written yesterday is recomputed even if its TTL
//! has not run out. The key's generation is read before any rows are loaded
//! and the write-back is conditional on it, so a booking that commits while a
//! view is being built keeps that view out of the cache.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::domain::booking_support::{
    BookingPorts, map_account_error, map_availability_error, map_reservation_error,
};
use crate::domain::ports::{
    AvailabilityCommand, CacheGeneration, DoctorCalendar, PublishAvailabilityRequest,
    ScheduleCacheKey, ScheduleQuery, ScheduleView,
};
use crate::domain::{
    Account, AdmissionContext, AdmissionDecision, AvailabilityId, AvailabilityWindow,
    BookingRequest, BookingResult, Rejection, SlotSet, UserId, check_admission, derive_slot_set,
    reserved_times,
};

/// Implements [`ScheduleQuery`] and [`AvailabilityCommand`].
#[derive(Clone)]
pub struct ScheduleService {
    ports: BookingPorts,
}

#[derive(Serialize, Deserialize)]
struct CachedAvailability {
    from: NaiveDate,
    windows: Vec<AvailabilityWindow>,
}

impl ScheduleService {
    /// Create the service over the shared driven ports.
    pub fn new(ports: BookingPorts) -> Self {
        Self { ports }
    }

    /// Read a cached view, treating backend and decode failures as misses.
    async fn cached<T: DeserializeOwned>(&self, key: &ScheduleCacheKey) -> Option<T> {
        match self.ports.cache.get(key).await {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(view) => Some(view),
                Err(err) => {
                    warn!(key = %key, error = %err, "discarding undecodable cached view");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                warn!(key = %key, kind = err.kind(), error = %err, "schedule cache read failed");
                None
            }
        }
    }

    /// Generation to build a view against. `None` disables the write-back.
    async fn generation(&self, key: &ScheduleCacheKey) -> Option<CacheGeneration> {
        match self.ports.cache.generation(key).await {
            Ok(generation) => Some(generation),
            Err(err) => {
                warn!(
                    key = %key,
                    kind = err.kind(),
                    error = %err,
                    "schedule cache generation read failed"
                );
                None
            }
        }
    }

    async fn store<T: Serialize + Sync>(
        &self,
        key: &ScheduleCacheKey,
        observed: Option<CacheGeneration>,
        view: &T,
    ) {
        let Some(observed) = observed else {
            return;
        };
        let value = match serde_json::to_value(view) {
            Ok(value) => value,
            Err(err) => {
                warn!(key = %key, error = %err, "failed to encode schedule view");
                return;
            }
        };
        match self.ports.cache.set(key, value, observed).await {
            Ok(true) => {}
            Ok(false) => debug!(key = %key, "schedule changed while the view was built; not cached"),
            Err(err) => {
                warn!(key = %key, kind = err.kind(), error = %err, "schedule cache write failed");
            }
        }
    }

    async fn build_calendar(&self, doctor: &Account, from: NaiveDate) -> BookingResult<DoctorCalendar> {
        let windows = self
            .ports
            .availability
            .list_for_doctor(&doctor.id, from)
            .await
            .map_err(map_availability_error)?;
        let reservations = self
            .ports
            .reservations
            .list_for_doctor(&doctor.id, from)
            .await
            .map_err(map_reservation_error)?;
        Ok(DoctorCalendar {
            doctor_id: doctor.id,
            doctor_name: doctor.name.clone(),
            specialization: doctor.specialization_label(),
            from,
            slots: derive_slot_set(&windows, &reservations, from),
            reserved: reserved_times(&reservations, from),
        })
    }
}

#[async_trait]
impl ScheduleQuery for ScheduleService {
    async fn derive_slots(&self, doctor_id: &UserId, from: NaiveDate) -> BookingResult<SlotSet> {
        let windows = self
            .ports
            .availability
            .list_for_doctor(doctor_id, from)
            .await
            .map_err(map_availability_error)?;
        let reservations = self
            .ports
            .reservations
            .list_for_doctor(doctor_id, from)
            .await
            .map_err(map_reservation_error)?;
        Ok(derive_slot_set(&windows, &reservations, from))
    }

    async fn doctor_calendar(&self, doctor_id: &UserId) -> BookingResult<DoctorCalendar> {
        let today = self.ports.today();
        let key = ScheduleCacheKey::new(doctor_id, ScheduleView::Calendar);
        if let Some(calendar) = self.cached::<DoctorCalendar>(&key).await {
            if calendar.from == today {
                debug!(key = %key, "calendar served from cache");
                return Ok(calendar);
            }
        }

        let observed = self.generation(&key).await;
        let doctor = self.ports.require_account(doctor_id, "Doctor").await?;
        let calendar = self.build_calendar(&doctor, today).await?;
        self.store(&key, observed, &calendar).await;
        Ok(calendar)
    }

    async fn check_admission(&self, request: &BookingRequest) -> BookingResult<AdmissionDecision> {
        self.ports.require_account(&request.doctor_id, "Doctor").await?;
        let windows = self
            .ports
            .availability
            .list_for_doctor_on(&request.doctor_id, request.date)
            .await
            .map_err(map_availability_error)?;
        let reservations = self
            .ports
            .reservations
            .list_for_doctor_on(&request.doctor_id, request.date)
            .await
            .map_err(map_reservation_error)?;
        Ok(check_admission(
            request,
            AdmissionContext {
                today: self.ports.today(),
                windows: &windows,
                reservations: &reservations,
            },
        ))
    }

    async fn list_doctors(&self) -> BookingResult<Vec<Account>> {
        Ok(self
            .ports
            .accounts
            .list_doctors_with_availability()
            .await
            .map_err(map_account_error)?)
    }
}

#[async_trait]
impl AvailabilityCommand for ScheduleService {
    async fn publish(&self, request: PublishAvailabilityRequest) -> BookingResult<AvailabilityWindow> {
        let doctor = self.ports.require_account(&request.doctor_id, "Doctor").await?;
        if doctor.specialization.is_none() {
            return Err(Rejection::validation(
                "You cannot publish availability without a specialization.",
            )
            .into());
        }
        if request.date < self.ports.today() {
            return Err(Rejection::validation("The availability date must be today or later.").into());
        }
        let window = AvailabilityWindow::new(
            AvailabilityId::random(),
            doctor.id,
            request.date,
            request.start,
            request.end,
        )
        .map_err(|err| Rejection::validation(format!("{err}.")))?;

        self.ports
            .availability
            .insert(&window)
            .await
            .map_err(map_availability_error)?;
        self.ports.invalidate_schedule(&doctor.id).await;
        info!(
            availability_id = %window.id(),
            doctor_id = %doctor.id,
            date = %window.date(),
            "availability published"
        );
        Ok(window)
    }

    async fn withdraw(&self, id: &AvailabilityId, doctor_id: &UserId) -> BookingResult<()> {
        let window = self
            .ports
            .availability
            .find_by_id(id)
            .await
            .map_err(map_availability_error)?
            .ok_or_else(|| Rejection::not_found("Availability not found."))?;
        if window.doctor_id() != *doctor_id {
            return Err(Rejection::unauthorized("Unauthorized").into());
        }
        let removed = self
            .ports
            .availability
            .delete(id)
            .await
            .map_err(map_availability_error)?;
        if !removed {
            return Err(Rejection::not_found("Availability not found.").into());
        }
        self.ports.invalidate_schedule(doctor_id).await;
        info!(availability_id = %id, doctor_id = %doctor_id, "availability withdrawn");
        Ok(())
    }

    async fn list_own(&self, doctor_id: &UserId) -> BookingResult<Vec<AvailabilityWindow>> {
        let today = self.ports.today();
        let key = ScheduleCacheKey::new(doctor_id, ScheduleView::Availabilities);
        if let Some(cached) = self.cached::<CachedAvailability>(&key).await {
            if cached.from == today {
                return Ok(cached.windows);
            }
        }

        let observed = self.generation(&key).await;
        let windows = self
            .ports
            .availability
            .list_for_doctor(doctor_id, today)
            .await
            .map_err(map_availability_error)?;
        let view = CachedAvailability {
            from: today,
            windows,
        };
        self.store(&key, observed, &view).await;
        Ok(view.windows)
    }
}

#[cfg(test)]
#[path = "schedule_service_tests.rs"]
mod tests;
