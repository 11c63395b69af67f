use std::path::PathBuf;

/// Fatal errors raised while bootstrapping a job context.
///
/// Every variant aborts the run; nothing here is retried.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A required configuration value is absent after all layers merged.
    #[error("Required configuration parameter \"{0}\" is null.")]
    Configuration(&'static str),

    /// The role elevation handshake returned something unexpected.
    #[error("Role elevation failed for job {job}: {message}")]
    Protocol { job: String, message: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A file exists but could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration or parameter file is not valid YAML.
    #[error("Error parsing YAML in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A database round trip failed. Wraps the driver's error.
    #[error("Database error: {0}")]
    Database(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl CoreError {
    pub(crate) fn protocol(job: &str, message: impl Into<String>) -> Self {
        Self::Protocol {
            job: job.to_string(),
            message: message.into(),
        }
    }
}
