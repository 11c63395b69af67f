//! Domain logic for bootstrapping a batch job's execution context.
//!
//! Everything here is database-driver agnostic: the role elevation
//! handshake and parameter resolution talk to the database through the
//! traits in [`session`], implemented by `jobsub-db`.

pub mod config;
pub mod error;
pub mod parameters;
pub mod report;
pub mod security;
pub mod session;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
