//! Driving port for the reservation lifecycle.

use async_trait::async_trait;

use crate::domain::{BookingRequest, BookingResult, Reservation, ReservationId, UserId};

/// Client-facing reservation lifecycle.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReservationCommand: Send + Sync {
    /// Admit and persist a booking, then notify the client.
    async fn create(&self, request: BookingRequest) -> BookingResult<Reservation>;

    /// Cancel a booking on behalf of its owner.
    async fn cancel(&self, id: &ReservationId, client_id: &UserId) -> BookingResult<()>;

    /// The client's bookings.
    async fn list_for_client(&self, client_id: &UserId) -> BookingResult<Vec<Reservation>>;
}
