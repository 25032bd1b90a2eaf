//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL repositories and notification inbox (Diesel)
//! - **memory**: single-process booking store for demos and tests
//! - **cache**: schedule view caches (Redis or in-process)
//! - **notifications**: log-based and fan-out dispatchers

pub mod cache;
pub mod memory;
pub mod notifications;
pub mod persistence;
