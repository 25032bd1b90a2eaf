//! Appointment booking backend.
//!
//! Doctors publish availability windows, clients book half-hour slots
//! derived from them, and administrators manage the doctor role. The
//! [`domain`] module holds the booking rules and ports; [`inbound`] and
//! [`outbound`] hold the adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use doc::ApiDoc;
pub use middleware::Trace;
