use jobsub_core::error::CoreError;

/// Top-level error for a job bootstrap.
///
/// Wraps [`CoreError`] for domain failures and adds the process-boundary
/// variants.
#[derive(Debug, thiserror::Error)]
pub enum JobsubError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Connecting to or querying the database failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A required environment variable is missing or malformed.
    #[error("Environment error: {0}")]
    Environment(String),

    /// Writing report output failed.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

pub type JobsubResult<T> = Result<T, JobsubError>;
