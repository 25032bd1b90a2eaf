//! Business-rule refusals.
//!
//! A [`Rejection`] is an expected outcome of a booking operation, not a
//! fault. Services return it inside [`BookingError::Rejected`] so callers can
//! tell rule refusals apart from infrastructure failures.

use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use super::{Error, ErrorCode};

/// Machine-readable reason a booking operation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// Malformed input or a past date.
    Validation,
    /// No availability window covers the requested time.
    NotAvailable,
    /// Another client already holds the slot.
    SlotTaken,
    /// The client already booked this doctor on the same day.
    DuplicateByClient,
    /// The caller does not own the target resource.
    Unauthorized,
    /// The target resource does not exist.
    NotFound,
}

impl RejectionReason {
    /// Wire code, identical to the serialised form.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotAvailable => "not_available",
            Self::SlotTaken => "slot_taken",
            Self::DuplicateByClient => "duplicate_by_client",
            Self::Unauthorized => "unauthorized",
            Self::NotFound => "not_found",
        }
    }

    /// Error category used when the refusal crosses a transport boundary.
    #[must_use]
    pub const fn error_code(self) -> ErrorCode {
        match self {
            Self::Validation => ErrorCode::InvalidRequest,
            Self::NotAvailable | Self::SlotTaken | Self::DuplicateByClient => {
                ErrorCode::UnprocessableEntity
            }
            Self::Unauthorized => ErrorCode::Forbidden,
            Self::NotFound => ErrorCode::NotFound,
        }
    }
}

/// A refusal with its reason and a message fit for end users.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct Rejection {
    reason: RejectionReason,
    message: String,
}

impl Rejection {
    /// Build a refusal with a custom message.
    pub fn new(reason: RejectionReason, message: impl Into<String>) -> Self {
        Self {
            reason,
            message: message.into(),
        }
    }

    /// Why the operation was refused.
    #[must_use]
    pub const fn reason(&self) -> RejectionReason {
        self.reason
    }

    /// End-user message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The input breaks a field or state rule.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(RejectionReason::Validation, message)
    }

    /// The slot is outside every published window.
    #[must_use]
    pub fn not_available() -> Self {
        Self::new(
            RejectionReason::NotAvailable,
            "Selected date and time are not available.",
        )
    }

    /// Another client holds the slot.
    #[must_use]
    pub fn slot_taken() -> Self {
        Self::new(RejectionReason::SlotTaken, "This time slot is already booked.")
    }

    /// The client already booked this doctor that day.
    #[must_use]
    pub fn duplicate_by_client() -> Self {
        Self::new(
            RejectionReason::DuplicateByClient,
            "You have already booked a reservation with this doctor on the same day.",
        )
    }

    /// The caller does not own the resource.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(RejectionReason::Unauthorized, message)
    }

    /// The referenced resource does not exist.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(RejectionReason::NotFound, message)
    }
}

impl From<Rejection> for Error {
    fn from(rejection: Rejection) -> Self {
        let reason = rejection.reason;
        Self::new(reason.error_code(), rejection.message)
            .with_details(json!({ "reason": reason.code() }))
    }
}

/// Failure of a booking operation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BookingError {
    /// A business rule refused the operation.
    #[error(transparent)]
    Rejected(#[from] Rejection),
    /// A port failed.
    #[error(transparent)]
    Failed(#[from] Error),
}

impl BookingError {
    /// Reason code when this is a rule refusal.
    #[must_use]
    pub fn reason(&self) -> Option<RejectionReason> {
        match self {
            Self::Rejected(rejection) => Some(rejection.reason()),
            Self::Failed(_) => None,
        }
    }
}

impl From<BookingError> for Error {
    fn from(error: BookingError) -> Self {
        match error {
            BookingError::Rejected(rejection) => rejection.into(),
            BookingError::Failed(error) => error,
        }
    }
}

/// Result alias for booking operations.
pub type BookingResult<T> = Result<T, BookingError>;
