//! HTTP adapter mapping for domain errors.
//!
//! The domain [`Error`] stays transport-agnostic; this module picks the
//! status code and renders the JSON body. Internal errors are redacted.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{BookingError, Error, ErrorCode, TRACE_ID_HEADER};

const REDACTED: &str = "Internal server error";

/// Result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

const fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::UnprocessableEntity => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Body to send for `error`; internal failures are logged and replaced by a
/// generic message that keeps only the trace id.
fn public_body(error: &Error) -> Error {
    if error.code() != ErrorCode::InternalError {
        return error.clone();
    }
    error!(message = error.message(), trace_id = error.trace_id(), "internal error");
    error.trace_id().map_or_else(
        || Error::internal(REDACTED),
        |id| Error::internal(REDACTED).with_trace_id(id),
    )
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(public_body(self))
    }
}

/// Lift a booking outcome into the handler error type.
pub(crate) fn booking<T>(result: Result<T, BookingError>) -> ApiResult<T> {
    result.map_err(Error::from)
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
