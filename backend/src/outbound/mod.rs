//! Outbound adapters implementing the domain's driven ports.
//!
//! - [`persistence`]: PostgreSQL via Diesel.
//! - [`memory`]: process-local user store for development and tests.
//! - [`svix`]: webhook signature verification.

pub mod memory;
pub mod persistence;
pub mod svix;
