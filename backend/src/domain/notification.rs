//! Lifecycle notifications sent to clients and administrators.
//!
//! Events are plain data. Dispatchers decide how to deliver them; the
//! rendered message is shared so every channel reads the same text.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::UserId;

/// Something a user should hear about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BookingEvent {
    /// A client's reservation was stored.
    #[serde(rename_all = "camelCase")]
    ReservationCreated {
        /// Name of the booked doctor.
        doctor_name: String,
        /// Doctor's specialisation, when set.
        specialization: Option<String>,
        /// Day of the visit.
        date: NaiveDate,
        /// Start of the booked slot.
        time: NaiveTime,
    },
    /// A doctor lost the role and their reservations were cancelled.
    #[serde(rename_all = "camelCase")]
    ReservationsDeleted {
        /// Name of the former doctor.
        doctor_name: String,
        /// Specialisation held before the revocation.
        specialization: Option<String>,
    },
}

impl BookingEvent {
    /// Stable event kind, used as a storage discriminator.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ReservationCreated { .. } => "reservation_created",
            Self::ReservationsDeleted { .. } => "reservations_deleted",
        }
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::ReservationCreated {
                doctor_name,
                specialization,
                date,
                time,
            } => format!(
                "Your reservation with Dr. {doctor_name}{} on {} at {} has been successfully created.",
                specialization_suffix(specialization.as_deref()),
                date.format("%Y-%m-%d"),
                time.format("%H:%M"),
            ),
            Self::ReservationsDeleted {
                doctor_name,
                specialization,
            } => format!(
                "Reservations with Dr. {doctor_name}{} have been cancelled.",
                specialization_suffix(specialization.as_deref()),
            ),
        }
    }
}

fn specialization_suffix(specialization: Option<&str>) -> String {
    specialization.map_or_else(String::new, |spec| format!(" ({spec})"))
}

/// An event addressed to one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Account to notify.
    pub recipient: UserId,
    /// What happened.
    pub event: BookingEvent,
}

impl Notification {
    /// Address `event` to `recipient`.
    #[must_use]
    pub const fn new(recipient: UserId, event: BookingEvent) -> Self {
        Self { recipient, event }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn created(specialization: Option<&str>) -> BookingEvent {
        BookingEvent::ReservationCreated {
            doctor_name: "Ada Lovelace".into(),
            specialization: specialization.map(str::to_owned),
            date: NaiveDate::from_ymd_opt(2030, 2, 3).expect("date"),
            time: NaiveTime::from_hms_opt(9, 30, 0).expect("time"),
        }
    }

    #[test]
    fn renders_created_message() {
        assert_eq!(
            created(Some("Cardiologist")).message(),
            "Your reservation with Dr. Ada Lovelace (Cardiologist) on 2030-02-03 at 09:30 has been successfully created."
        );
    }

    #[test]
    fn omits_missing_specialization() {
        assert!(created(None).message().starts_with("Your reservation with Dr. Ada Lovelace on"));
    }

    #[test]
    fn renders_deleted_message() {
        let event = BookingEvent::ReservationsDeleted {
            doctor_name: "Ada Lovelace".into(),
            specialization: Some("Neurologist".into()),
        };
        assert_eq!(
            event.message(),
            "Reservations with Dr. Ada Lovelace (Neurologist) have been cancelled."
        );
        assert_eq!(event.kind(), "reservations_deleted");
    }

    #[test]
    fn serialises_with_type_tag() {
        let value = serde_json::to_value(created(None)).expect("serialises");
        assert_eq!(value["type"], "reservation_created");
        assert_eq!(value["doctorName"], "Ada Lovelace");
    }
}
