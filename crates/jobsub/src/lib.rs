//! `jobsub` library crate.
//!
//! Bootstraps the execution context of a batch job: configuration, database
//! session, role elevation, parameters and report framing. The binary
//! entrypoint lives in `main.rs`.

pub mod context;
pub mod env;
pub mod error;
pub mod output;

pub use context::{JobContext, JobRequest};
pub use error::JobsubError;
