//! Shared validation helpers for inbound HTTP adapters.
//!
//! Dates travel as `YYYY-MM-DD` and times as `HH:MM`, matching the slot
//! grid; seconds are not accepted.

use chrono::{NaiveDate, NaiveTime};
use serde_json::json;

use crate::domain::{Error, RejectionReason, Specialization, UserId};

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";
pub(crate) const TIME_FORMAT: &str = "%H:%M";

/// Machine-readable validation codes placed in `details.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValidationCode {
    MissingField,
    InvalidUuid,
    InvalidDate,
    InvalidTime,
    InvalidSpecialization,
}

impl ValidationCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidDate => "invalid_date",
            Self::InvalidTime => "invalid_time",
            Self::InvalidSpecialization => "invalid_specialization",
        }
    }
}

/// Wire name of a request field, as the client sent it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    const fn as_str(self) -> &'static str {
        self.0
    }
}

/// Field failures carry the same `reason` as rule-level validation refusals.
fn field_error(field: FieldName, message: String, code: ValidationCode, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "reason": RejectionReason::Validation.code(),
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    Error::invalid_request(format!("missing required field: {name}")).with_details(json!({
        "reason": RejectionReason::Validation.code(),
        "field": name,
        "code": ValidationCode::MissingField.as_str(),
    }))
}

pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

pub(crate) fn parse_user_id(value: &str, field: FieldName) -> Result<UserId, Error> {
    UserId::new(value).map_err(|_| {
        field_error(
            field,
            format!("{} must be a valid UUID", field.as_str()),
            ValidationCode::InvalidUuid,
            value,
        )
    })
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<uuid::Uuid, Error> {
    uuid::Uuid::parse_str(value.trim()).map_err(|_| {
        field_error(
            field,
            format!("{} must be a valid UUID", field.as_str()),
            ValidationCode::InvalidUuid,
            value,
        )
    })
}

pub(crate) fn parse_date(value: &str, field: FieldName) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        field_error(
            field,
            format!("{} must be a date formatted as YYYY-MM-DD", field.as_str()),
            ValidationCode::InvalidDate,
            value,
        )
    })
}

pub(crate) fn parse_time(value: &str, field: FieldName) -> Result<NaiveTime, Error> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT).map_err(|_| {
        field_error(
            field,
            format!("{} must be a time formatted as HH:MM", field.as_str()),
            ValidationCode::InvalidTime,
            value,
        )
    })
}

pub(crate) fn parse_specialization(value: String, field: FieldName) -> Result<Specialization, Error> {
    Specialization::new(value.clone()).map_err(|err| {
        field_error(
            field,
            err.to_string(),
            ValidationCode::InvalidSpecialization,
            &value,
        )
    })
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}
