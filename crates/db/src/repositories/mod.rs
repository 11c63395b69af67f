//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept the run's `&mut PgConnection` as the first argument.

pub mod institution_repo;
pub mod job_repo;
pub mod parameter_definition_repo;
pub mod run_parameter_repo;
pub mod security_repo;

pub use institution_repo::InstitutionRepo;
pub use job_repo::JobRepo;
pub use parameter_definition_repo::ParameterDefinitionRepo;
pub use run_parameter_repo::RunParameterRepo;
pub use security_repo::SecurityRepo;
