//! Repository for the `gjbprun` run parameter archive.
//!
//! Rows are consumed once: a replay reads them, validates them, then
//! deletes them. The two statements are not wrapped in a transaction.

use jobsub_core::types::OneUpNo;
use sqlx::PgConnection;

use crate::models::parameter::RunParameterRow;

/// Column list for `gjbprun` queries.
const COLUMNS: &str = "gjbprun_job, gjbprun_one_up_no, gjbprun_number, gjbprun_value";

pub struct RunParameterRepo;

impl RunParameterRepo {
    /// Archived values for one run, ordered by parameter number.
    pub async fn list_for_run(
        conn: &mut PgConnection,
        job: &str,
        one_up: OneUpNo,
    ) -> Result<Vec<RunParameterRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM gjbprun \
             WHERE gjbprun_job = $1 AND gjbprun_one_up_no = $2 \
             ORDER BY gjbprun_number"
        );
        sqlx::query_as::<_, RunParameterRow>(&query)
            .bind(job)
            .bind(one_up)
            .fetch_all(conn)
            .await
    }

    /// Delete every archived value of one run. Returns the count of deleted rows.
    pub async fn delete_for_run(
        conn: &mut PgConnection,
        job: &str,
        one_up: OneUpNo,
    ) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM gjbprun WHERE gjbprun_job = $1 AND gjbprun_one_up_no = $2")
                .bind(job)
                .bind(one_up)
                .execute(conn)
                .await?;
        Ok(result.rows_affected())
    }
}
