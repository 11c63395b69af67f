//! Repository for the `gjbjobs` job catalog.

use sqlx::PgConnection;

/// Read-only access to the job catalog.
pub struct JobRepo;

impl JobRepo {
    /// Display title of a job. Fails with `RowNotFound` for an unknown job.
    pub async fn find_title(conn: &mut PgConnection, name: &str) -> Result<String, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT gjbjobs_title FROM gjbjobs WHERE gjbjobs_name = $1")
            .bind(name)
            .fetch_one(conn)
            .await
    }
}
