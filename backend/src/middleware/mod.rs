//! Actix middleware shared by every booking route.

pub mod trace;

pub use trace::Trace;
