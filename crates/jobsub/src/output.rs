//! Destination of a job's report output.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use jobsub_core::error::CoreError;

/// Where report output goes. Diagnostics always go to stderr.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutputSink {
    #[default]
    Stdout,
    /// Create or truncate the file at this path.
    File(PathBuf),
}

impl OutputSink {
    pub fn open(&self) -> Result<Box<dyn Write + Send>, CoreError> {
        match self {
            Self::Stdout => Ok(Box::new(std::io::stdout())),
            Self::File(path) => {
                let file = File::create(path).map_err(|source| CoreError::Io {
                    path: path.clone(),
                    source,
                })?;
                tracing::debug!(path = %path.display(), "Report output redirected");
                Ok(Box::new(BufWriter::new(file)))
            }
        }
    }
}
