//! `jobsub` -- bootstrap a batch job and print its report framing.
//!
//! Resolves configuration, opens an elevated database session, resolves
//! the job's parameters, then writes the report header and control page.
//! See [`jobsub::env`] for the environment variables read at startup.

use jobsub::env::ProcessEnvironment;
use jobsub::{JobContext, JobsubError};
use jobsub_core::parameters::LinePrompter;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();

    // Report output owns stdout; diagnostics go to stderr.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jobsub=info,jobsub_core=info,jobsub_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "Job bootstrap failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), JobsubError> {
    let env = ProcessEnvironment::from_env()?;
    let request = env.job_request()?;
    let resolver = env.config_resolver();

    tracing::info!(
        job = %request.job,
        one_up = ?request.one_up,
        config_files = resolver.files().len(),
        "Starting jobsub",
    );

    let mut prompter = LinePrompter::stdio();
    let mut context = JobContext::bootstrap(&resolver, request, &mut prompter).await?;

    match serde_json::to_string(context.parameters()) {
        Ok(json) => tracing::debug!(parameters = %json, "Resolved parameter set"),
        Err(e) => tracing::warn!(error = %e, "Could not serialize parameter set"),
    }

    context.write_control_page(1)?;
    context.write_footer()?;
    context.flush()?;
    Ok(())
}
