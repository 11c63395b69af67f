//! Job context bootstrap.
//!
//! Runs the steps in order: resolve configuration, open the session,
//! elevate the role, fetch the title, resolve parameters, settle the page
//! length, build the report framing and open the output sink. Any failure
//! aborts the bootstrap.

use std::io::Write;
use std::path::PathBuf;

use jobsub_core::config::{ConfigLayer, ConfigResolver, JobsubConfig};
use jobsub_core::parameters::{ParameterResolver, ParameterSet, ParameterSource, Prompter};
use jobsub_core::report::{self, ReportFormatter};
use jobsub_core::security::{Elevation, RoleElevator};
use jobsub_core::session::JobSession;
use jobsub_core::types::OneUpNo;
use jobsub_db::PgSession;

use crate::error::JobsubResult;
use crate::output::OutputSink;

/// What to run and where its inputs live.
#[derive(Debug, Clone)]
pub struct JobRequest {
    pub job: String,
    /// Declared parameter names. Definition `n` maps to `parameter_names[n - 1]`.
    pub parameter_names: Vec<String>,
    pub one_up: Option<OneUpNo>,
    /// Directory searched for the job's parameter file.
    pub working_dir: PathBuf,
    /// Highest-precedence configuration layer.
    pub overrides: ConfigLayer,
    pub output: OutputSink,
}

/// A bootstrapped job: elevated session, parameters and report framing.
pub struct JobContext<S> {
    name: String,
    title: String,
    parameters: ParameterSet,
    page_length: u32,
    elevation: Elevation,
    formatter: ReportFormatter,
    session: S,
    output: Box<dyn Write + Send>,
}

impl JobContext<PgSession> {
    /// Resolve configuration, connect, and bootstrap against PostgreSQL.
    pub async fn bootstrap<P: Prompter + ?Sized>(
        resolver: &ConfigResolver,
        request: JobRequest,
        prompter: &mut P,
    ) -> JobsubResult<Self> {
        // Seeds are validated here, before any connection is attempted.
        let config = resolver.resolve(request.overrides.clone())?;
        let session = PgSession::connect(&config.credential).await?;
        Self::bootstrap_with(session, &config, request, prompter).await
    }
}

impl<S: JobSession> JobContext<S> {
    /// Bootstrap on an already open session.
    pub async fn bootstrap_with<P: Prompter + ?Sized>(
        mut session: S,
        config: &JobsubConfig,
        request: JobRequest,
        prompter: &mut P,
    ) -> JobsubResult<Self> {
        let JobRequest {
            job,
            parameter_names,
            one_up,
            working_dir,
            output,
            ..
        } = request;

        let elevation = RoleElevator::new(config.seeds)
            .elevate(&mut session, &job)
            .await?;
        let title = session.job_title(&job).await?;

        let source = ParameterSource::select(&job, one_up, &working_dir);
        let resolved = ParameterResolver::new(job.as_str(), parameter_names)
            .resolve(&mut session, &source, prompter)
            .await?;
        let page_length = resolved.page_length.unwrap_or(config.page_length);

        let header = if config.header.is_empty() {
            let institution = session.institution_name().await?;
            report::default_header(chrono::Local::now(), &institution, &job, &title)
        } else {
            config.header.clone()
        };
        let formatter = ReportFormatter::new(header, config.footer.as_str());
        let output = output.open()?;

        tracing::info!(
            job = %job,
            title = %title,
            page_length,
            parameters = resolved.parameters.len(),
            "Job context ready"
        );

        Ok(Self {
            name: job,
            title,
            parameters: resolved.parameters,
            page_length,
            elevation,
            formatter,
            session,
            output,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }

    pub fn page_length(&self) -> u32 {
        self.page_length
    }

    pub fn elevation(&self) -> &Elevation {
        &self.elevation
    }

    pub fn formatter(&self) -> &ReportFormatter {
        &self.formatter
    }

    /// Header for `page` with the page number filled in.
    pub fn header(&self, page: u32) -> String {
        self.formatter.header(&page.to_string())
    }

    pub fn footer(&self) -> &str {
        self.formatter.footer()
    }

    /// The elevated session, for the job body's own work.
    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    pub fn output(&mut self) -> &mut (dyn Write + Send) {
        self.output.as_mut()
    }

    pub fn write_header(&mut self, page: u32) -> JobsubResult<()> {
        let header = self.header(page);
        self.output.write_all(header.as_bytes())?;
        Ok(())
    }

    /// Header followed by the parameter listing.
    pub fn write_control_page(&mut self, page: u32) -> JobsubResult<()> {
        let page = self
            .formatter
            .control_page(&self.parameters, &page.to_string());
        self.output.write_all(page.as_bytes())?;
        Ok(())
    }

    pub fn write_footer(&mut self) -> JobsubResult<()> {
        self.output.write_all(self.formatter.footer().as_bytes())?;
        Ok(())
    }

    pub fn flush(&mut self) -> JobsubResult<()> {
        self.output.flush()?;
        Ok(())
    }

    pub fn into_session(self) -> S {
        self.session
    }
}
