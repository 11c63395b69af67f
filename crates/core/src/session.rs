//! Database-facing traits the core logic is written against.
//!
//! `jobsub-db` implements these on a live PostgreSQL connection; tests use
//! in-memory fakes. Every method is one blocking round trip from the
//! caller's point of view: callers await each before issuing the next.

use std::future::Future;

use crate::error::CoreError;
use crate::parameters::{ParameterDefinition, RunArchiveEntry};
use crate::security::{ElevatedRole, Verification};
use crate::types::OneUpNo;

/// Stored routines used by the role elevation handshake.
pub trait SecurityGateway: Send {
    /// Call the verification routine for `job`. The protocol version is
    /// always bound as NULL.
    fn verify_password(
        &mut self,
        job: &str,
        password: Option<&str>,
    ) -> impl Future<Output = Result<Verification, CoreError>> + Send;

    /// Decrypt `payload` with the given seed.
    fn decrypt(
        &mut self,
        payload: &str,
        seed: i64,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;

    /// Switch the session to `role`. Cannot be undone without reconnecting.
    fn set_role(
        &mut self,
        role: &ElevatedRole,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}

/// Parameter schema and run archive access.
pub trait ParameterStore: Send {
    /// Parameter definitions for `job`, ordered by number ascending.
    fn parameter_definitions(
        &mut self,
        job: &str,
    ) -> impl Future<Output = Result<Vec<ParameterDefinition>, CoreError>> + Send;

    /// Archived values for one prior run, ordered by parameter number.
    fn archived_values(
        &mut self,
        job: &str,
        one_up: OneUpNo,
    ) -> impl Future<Output = Result<Vec<RunArchiveEntry>, CoreError>> + Send;

    /// Delete the archived values for one prior run. Returns rows removed.
    fn delete_archived_values(
        &mut self,
        job: &str,
        one_up: OneUpNo,
    ) -> impl Future<Output = Result<u64, CoreError>> + Send;
}

/// Job catalog and institution lookups used for report framing.
pub trait JobCatalog: Send {
    fn job_title(&mut self, job: &str) -> impl Future<Output = Result<String, CoreError>> + Send;

    fn institution_name(&mut self) -> impl Future<Output = Result<String, CoreError>> + Send;
}

/// Everything a job context needs from its session.
pub trait JobSession: SecurityGateway + ParameterStore + JobCatalog {}

impl<T: SecurityGateway + ParameterStore + JobCatalog> JobSession for T {}
