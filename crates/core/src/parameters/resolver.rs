//! Selects the parameter source for a run and resolves the values.

use std::path::{Path, PathBuf};

use crate::error::CoreError;
use crate::session::ParameterStore;
use crate::types::OneUpNo;

use super::archive;
use super::file;
use super::prompt::{self, Prompter};
use super::{ParameterSchema, ParameterSet};

/// Where a run's parameter values come from. Exactly one applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterSource {
    /// Replay the values archived under a one-up number.
    Archive { one_up: OneUpNo },
    /// Read the job's parameter file.
    File { path: PathBuf },
    /// Ask on the terminal.
    Prompt,
}

impl ParameterSource {
    /// Pick the source in priority order: archive when a one-up number was
    /// supplied, then the job's parameter file if it exists, then prompts.
    pub fn select(job: &str, one_up: Option<OneUpNo>, working_dir: &Path) -> Self {
        if let Some(one_up) = one_up {
            return Self::Archive { one_up };
        }
        let path = file::parameter_file_path(working_dir, job);
        if path.is_file() {
            return Self::File { path };
        }
        Self::Prompt
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Archive { .. } => "archive",
            Self::File { .. } => "file",
            Self::Prompt => "prompt",
        }
    }
}

/// Fully resolved parameters for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedParameters {
    pub parameters: ParameterSet,
    /// Page length recorded with an archived run, if any.
    pub page_length: Option<u32>,
}

/// Resolves a job's parameters against its declared names.
#[derive(Debug, Clone)]
pub struct ParameterResolver {
    job: String,
    names: Vec<String>,
}

impl ParameterResolver {
    pub fn new(job: impl Into<String>, names: Vec<String>) -> Self {
        Self {
            job: job.into(),
            names,
        }
    }

    /// Load the schema, then fill it from `source`.
    ///
    /// Archived rows are deleted only after all of them validated.
    pub async fn resolve<S, P>(
        &self,
        store: &mut S,
        source: &ParameterSource,
        prompter: &mut P,
    ) -> Result<ResolvedParameters, CoreError>
    where
        S: ParameterStore,
        P: Prompter + ?Sized,
    {
        let definitions = store.parameter_definitions(&self.job).await?;
        let schema = ParameterSchema::new(&self.job, &self.names, &definitions)?;
        tracing::debug!(
            job = %self.job,
            definitions = definitions.len(),
            source = source.label(),
            "Resolving job parameters"
        );

        let resolved = match source {
            ParameterSource::Archive { one_up } => {
                let rows = store.archived_values(&self.job, *one_up).await?;
                let replayed = archive::replay(&schema, *one_up, &rows)?;

                let deleted = store.delete_archived_values(&self.job, *one_up).await?;
                if deleted != rows.len() as u64 {
                    tracing::warn!(
                        job = %self.job,
                        one_up,
                        read = rows.len(),
                        deleted,
                        "Archive row count changed between read and delete"
                    );
                }
                ResolvedParameters {
                    parameters: replayed.parameters,
                    page_length: replayed.page_length,
                }
            }
            ParameterSource::File { path } => ResolvedParameters {
                parameters: file::load(&schema, path)?,
                page_length: None,
            },
            ParameterSource::Prompt => ResolvedParameters {
                parameters: prompt::collect(&schema, prompter)?,
                page_length: None,
            },
        };

        tracing::info!(
            job = %self.job,
            source = source.label(),
            parameters = resolved.parameters.len(),
            "Job parameters resolved"
        );
        Ok(resolved)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
