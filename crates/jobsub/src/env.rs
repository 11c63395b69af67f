//! Process environment, read once at startup.
//!
//! | Variable        | Required | Description                                    |
//! |-----------------|----------|------------------------------------------------|
//! | `JOBSUB_JOB`    | yes      | Job name, e.g. `GLBDATA`                       |
//! | `JOBSUB_PARAMS` | no       | Comma-separated declared parameter names       |
//! | `JOBSUB_OUTPUT` | no       | Report file; stdout when unset                 |
//! | `ONE_UP`        | no       | Archived run to replay parameters from         |
//! | `BANUID`        | no       | Default database username                      |
//! | `PSWD`          | no       | Default database password                      |
//! | `ORACLE_SID`    | no       | Default instance, `host[:port]/database`       |
//! | `BANNER_HOME`   | no       | Root of the site configuration directory       |
//!
//! Empty values count as unset.

use std::path::PathBuf;

use jobsub_core::config::{ConfigLayer, ConfigResolver};
use jobsub_core::types::OneUpNo;

use crate::context::JobRequest;
use crate::error::JobsubError;
use crate::output::OutputSink;

#[derive(Clone)]
pub struct ProcessEnvironment {
    pub username: Option<String>,
    pub password: Option<String>,
    pub instance: Option<String>,
    pub banner_home: Option<PathBuf>,
    pub home: Option<PathBuf>,
    pub one_up: Option<OneUpNo>,
    pub job: Option<String>,
    pub parameter_names: Vec<String>,
    pub output: Option<PathBuf>,
    pub working_dir: PathBuf,
}

impl ProcessEnvironment {
    /// Read the real process environment.
    pub fn from_env() -> Result<Self, JobsubError> {
        let working_dir = std::env::current_dir().map_err(|e| {
            JobsubError::Environment(format!("cannot determine working directory: {e}"))
        })?;
        Self::from_lookup(|key| std::env::var(key).ok(), dirs::home_dir(), working_dir)
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F, home: Option<PathBuf>, working_dir: PathBuf) -> Result<Self, JobsubError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let one_up = match var("ONE_UP") {
            Some(raw) => Some(raw.trim().parse::<OneUpNo>().map_err(|_| {
                JobsubError::Environment(format!("ONE_UP must be an integer, got {raw:?}"))
            })?),
            None => None,
        };

        let parameter_names = var("JOBSUB_PARAMS")
            .map(|raw| {
                raw.split(',')
                    .map(|name| name.trim().to_string())
                    .filter(|name| !name.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            username: var("BANUID"),
            password: var("PSWD"),
            instance: var("ORACLE_SID"),
            banner_home: var("BANNER_HOME").map(PathBuf::from),
            home,
            one_up,
            job: var("JOBSUB_JOB"),
            parameter_names,
            output: var("JOBSUB_OUTPUT").map(PathBuf::from),
            working_dir,
        })
    }

    /// Built-in configuration defaults seeded with the environment credentials.
    pub fn config_defaults(&self) -> ConfigLayer {
        ConfigLayer::defaults(
            self.username.clone(),
            self.password.clone(),
            self.instance.clone(),
        )
    }

    /// Resolver over the defaults, the site file and the user file.
    pub fn config_resolver(&self) -> ConfigResolver {
        ConfigResolver::standard(
            self.config_defaults(),
            self.banner_home.as_deref(),
            self.home.as_deref(),
        )
    }

    pub fn output_sink(&self) -> OutputSink {
        match &self.output {
            Some(path) => OutputSink::File(path.clone()),
            None => OutputSink::Stdout,
        }
    }

    /// The job run described by the environment.
    pub fn job_request(&self) -> Result<JobRequest, JobsubError> {
        let job = self.job.clone().ok_or_else(|| {
            JobsubError::Environment("JOBSUB_JOB environment variable is required".into())
        })?;
        Ok(JobRequest {
            job,
            parameter_names: self.parameter_names.clone(),
            one_up: self.one_up,
            working_dir: self.working_dir.clone(),
            overrides: ConfigLayer::default(),
            output: self.output_sink(),
        })
    }
}

impl std::fmt::Debug for ProcessEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessEnvironment")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("instance", &self.instance)
            .field("banner_home", &self.banner_home)
            .field("home", &self.home)
            .field("one_up", &self.one_up)
            .field("job", &self.job)
            .field("parameter_names", &self.parameter_names)
            .field("output", &self.output)
            .field("working_dir", &self.working_dir)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
