//! Accounts and the roles that gate booking operations.
//!
//! Registration and credentials live outside this service; accounts arrive
//! pre-provisioned and only their role and specialisation change here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Longest specialisation label accepted.
pub const SPECIALIZATION_MAX: usize = 64;

/// Validation failures for account primitives.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountValidationError {
    /// Identifier is not a UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
    /// Role label is not one of `client`, `doctor`, `admin`.
    #[error("unknown role `{0}`")]
    UnknownRole(String),
    /// Specialisation is blank after trimming.
    #[error("specialization must not be empty")]
    EmptySpecialization,
    /// Specialisation exceeds the length limit.
    #[error("specialization must be at most {max} characters")]
    SpecializationTooLong {
        /// Maximum accepted length in characters.
        max: usize,
    },
}

/// Stable account identifier.
///
/// Doctors, clients and administrators share the same identifier space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Parse an identifier from its textual form.
    pub fn new(value: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        Uuid::parse_str(value.as_ref().trim())
            .map(Self)
            .map_err(|_| AccountValidationError::InvalidId)
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Borrow the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Role held by an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Books and cancels reservations.
    Client,
    /// Publishes availability and receives bookings.
    Doctor,
    /// Grants and revokes the doctor role.
    Admin,
}

impl Role {
    /// Lowercase storage and wire form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Doctor => "doctor",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AccountValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "client" | "user" => Ok(Self::Client),
            "doctor" => Ok(Self::Doctor),
            "admin" => Ok(Self::Admin),
            other => Err(AccountValidationError::UnknownRole(other.to_owned())),
        }
    }
}

/// Medical specialisation shown next to a doctor's name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Specialization(String);

impl Specialization {
    /// Validate and wrap a specialisation label.
    pub fn new(value: impl Into<String>) -> Result<Self, AccountValidationError> {
        let trimmed = value.into().trim().to_owned();
        if trimmed.is_empty() {
            return Err(AccountValidationError::EmptySpecialization);
        }
        if trimmed.chars().count() > SPECIALIZATION_MAX {
            return Err(AccountValidationError::SpecializationTooLong {
                max: SPECIALIZATION_MAX,
            });
        }
        Ok(Self(trimmed))
    }

    /// Borrow the label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Specialization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Specialization {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Specialization> for String {
    fn from(value: Specialization) -> Self {
        value.0
    }
}

/// A provisioned account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Stable identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Booking role.
    pub role: Role,
    /// Required for doctors; `None` otherwise.
    pub specialization: Option<Specialization>,
}

impl Account {
    /// Whether the account currently holds the doctor role.
    #[must_use]
    pub fn is_doctor(&self) -> bool {
        self.role == Role::Doctor
    }

    /// Specialisation as an owned label, for notifications.
    #[must_use]
    pub fn specialization_label(&self) -> Option<String> {
        self.specialization.as_ref().map(ToString::to_string)
    }
}
