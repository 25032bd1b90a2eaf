//! Reservation lifecycle: create, cancel and list.

use async_trait::async_trait;
use tracing::info;

use crate::domain::booking_support::{
    BookingPorts, map_availability_error, map_reservation_error,
};
use crate::domain::ports::ReservationCommand;
use crate::domain::{
    AdmissionContext, BookingEvent, BookingRequest, BookingResult, Notification, Rejection,
    Reservation, ReservationId, UserId, check_admission,
};

/// Implements [`ReservationCommand`].
#[derive(Clone)]
pub struct ReservationService {
    ports: BookingPorts,
}

impl ReservationService {
    /// Create the service over the shared driven ports.
    pub fn new(ports: BookingPorts) -> Self {
        Self { ports }
    }
}

#[async_trait]
impl ReservationCommand for ReservationService {
    async fn create(&self, request: BookingRequest) -> BookingResult<Reservation> {
        let doctor = self.ports.require_account(&request.doctor_id, "Doctor").await?;

        let windows = self
            .ports
            .availability
            .list_for_doctor_on(&doctor.id, request.date)
            .await
            .map_err(map_availability_error)?;
        let existing = self
            .ports
            .reservations
            .list_for_doctor_on(&doctor.id, request.date)
            .await
            .map_err(map_reservation_error)?;
        let now = self.ports.clock.utc();
        check_admission(
            &request,
            AdmissionContext {
                today: now.date_naive(),
                windows: &windows,
                reservations: &existing,
            },
        )
        .into_result()?;

        let reservation = Reservation::confirm(request, now);
        self.ports
            .reservations
            .insert(&reservation)
            .await
            .map_err(map_reservation_error)?;
        self.ports.invalidate_schedule(&doctor.id).await;

        info!(
            reservation_id = %reservation.id,
            doctor_id = %reservation.doctor_id,
            client_id = %reservation.client_id,
            date = %reservation.date,
            time = %reservation.time.format("%H:%M"),
            "reservation created"
        );

        let event = BookingEvent::ReservationCreated {
            doctor_name: doctor.name.clone(),
            specialization: doctor.specialization_label(),
            date: reservation.date,
            time: reservation.time,
        };
        self.ports
            .notify_all([Notification::new(reservation.client_id, event)])
            .await;
        Ok(reservation)
    }

    async fn cancel(&self, id: &ReservationId, client_id: &UserId) -> BookingResult<()> {
        let reservation = self
            .ports
            .reservations
            .find_by_id(id)
            .await
            .map_err(map_reservation_error)?
            .ok_or_else(|| Rejection::not_found("Reservation not found."))?;
        if reservation.client_id != *client_id {
            return Err(Rejection::unauthorized("Unauthorized").into());
        }
        let removed = self
            .ports
            .reservations
            .delete(id)
            .await
            .map_err(map_reservation_error)?;
        if !removed {
            return Err(Rejection::not_found("Reservation not found.").into());
        }
        self.ports.invalidate_schedule(&reservation.doctor_id).await;
        info!(
            reservation_id = %id,
            doctor_id = %reservation.doctor_id,
            client_id = %client_id,
            "reservation cancelled"
        );
        Ok(())
    }

    async fn list_for_client(&self, client_id: &UserId) -> BookingResult<Vec<Reservation>> {
        self.ports
            .reservations
            .list_for_client(client_id)
            .await
            .map_err(map_reservation_error)
    }
}

#[cfg(test)]
#[path = "reservation_service_tests.rs"]
mod tests;
