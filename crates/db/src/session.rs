//! The database session owned by one job run.

use jobsub_core::config::Credential;
use jobsub_core::error::CoreError;
use jobsub_core::parameters::{ParameterDefinition, RunArchiveEntry};
use jobsub_core::security::{ElevatedRole, Verification};
use jobsub_core::session::{JobCatalog, ParameterStore, SecurityGateway};
use jobsub_core::types::OneUpNo;
use sqlx::PgConnection;

use crate::repositories::{
    InstitutionRepo, JobRepo, ParameterDefinitionRepo, RunParameterRepo, SecurityRepo,
};

/// Exclusive connection for one job run.
pub struct PgSession {
    conn: PgConnection,
}

impl PgSession {
    pub fn new(conn: PgConnection) -> Self {
        Self { conn }
    }

    /// Connect as `credential` and verify the connection answers.
    pub async fn connect(credential: &Credential) -> Result<Self, sqlx::Error> {
        let mut conn = crate::connect(credential).await?;
        crate::health_check(&mut conn).await?;
        tracing::info!(
            username = %credential.username,
            instance = %credential.instance,
            "Database session opened"
        );
        Ok(Self::new(conn))
    }

    /// The underlying connection, for the job body's own queries.
    pub fn connection(&mut self) -> &mut PgConnection {
        &mut self.conn
    }

    pub fn into_connection(self) -> PgConnection {
        self.conn
    }
}

fn database_error(err: sqlx::Error) -> CoreError {
    CoreError::Database(Box::new(err))
}

impl SecurityGateway for PgSession {
    async fn verify_password(
        &mut self,
        job: &str,
        password: Option<&str>,
    ) -> Result<Verification, CoreError> {
        SecurityRepo::verify_password(&mut self.conn, job, password)
            .await
            .map(Verification::from)
            .map_err(database_error)
    }

    async fn decrypt(&mut self, payload: &str, seed: i64) -> Result<String, CoreError> {
        SecurityRepo::decrypt(&mut self.conn, payload, seed)
            .await
            .map_err(database_error)
    }

    async fn set_role(&mut self, role: &ElevatedRole) -> Result<(), CoreError> {
        SecurityRepo::set_role(&mut self.conn, role.role(), role.password())
            .await
            .map_err(database_error)
    }
}

impl ParameterStore for PgSession {
    async fn parameter_definitions(
        &mut self,
        job: &str,
    ) -> Result<Vec<ParameterDefinition>, CoreError> {
        ParameterDefinitionRepo::list_for_job(&mut self.conn, job)
            .await
            .map_err(database_error)?
            .into_iter()
            .map(ParameterDefinition::try_from)
            .collect()
    }

    async fn archived_values(
        &mut self,
        job: &str,
        one_up: OneUpNo,
    ) -> Result<Vec<RunArchiveEntry>, CoreError> {
        let rows = RunParameterRepo::list_for_run(&mut self.conn, job, one_up)
            .await
            .map_err(database_error)?;
        Ok(rows.into_iter().map(RunArchiveEntry::from).collect())
    }

    async fn delete_archived_values(&mut self, job: &str, one_up: OneUpNo) -> Result<u64, CoreError> {
        let deleted = RunParameterRepo::delete_for_run(&mut self.conn, job, one_up)
            .await
            .map_err(database_error)?;
        tracing::debug!(job, one_up, deleted, "Consumed archived run parameters");
        Ok(deleted)
    }
}

impl JobCatalog for PgSession {
    async fn job_title(&mut self, job: &str) -> Result<String, CoreError> {
        match JobRepo::find_title(&mut self.conn, job).await {
            Ok(title) => Ok(title),
            Err(sqlx::Error::RowNotFound) => Err(CoreError::Validation(format!(
                "job {job} is not in the job catalog"
            ))),
            Err(err) => Err(database_error(err)),
        }
    }

    async fn institution_name(&mut self) -> Result<String, CoreError> {
        InstitutionRepo::find_name(&mut self.conn)
            .await
            .map_err(database_error)
    }
}
