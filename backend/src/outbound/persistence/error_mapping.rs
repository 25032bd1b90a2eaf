//! Shared Diesel error classification.
//!
//! Repositories call [`classify`] and then map the outcome onto their own
//! port error, which keeps the logging in one place.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Coarse classification of a Diesel failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    Connection(&'static str),
    Query(&'static str),
    /// Unique violation, with the constraint name when Postgres reports it.
    Unique(Option<String>),
}

pub(crate) fn classify(error: diesel::result::Error) -> DieselFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => DieselFailure::Query("record not found"),
        DieselError::QueryBuilderError(_) => DieselFailure::Query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            DieselFailure::Unique(info.constraint_name().map(str::to_owned))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DieselFailure::Connection("database connection error")
        }
        _ => DieselFailure::Query("database error"),
    }
}

/// Map a [`DieselFailure`] through basic connection/query constructors,
/// treating unique violations as plain query failures.
pub(crate) fn map_basic<E, Q, C>(error: diesel::result::Error, query: Q, connection: C) -> E
where
    Q: FnOnce(&'static str) -> E,
    C: FnOnce(&'static str) -> E,
{
    match classify(error) {
        DieselFailure::Connection(message) => connection(message),
        DieselFailure::Query(message) => query(message),
        DieselFailure::Unique(_) => query("unique constraint violated"),
    }
}

/// Map pool errors into a repository connection error.
pub(crate) fn map_pool<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    connection(error.message().to_owned())
}
