//! Repository for the `gjbpdef` parameter schema.

use sqlx::PgConnection;

use crate::models::parameter::ParameterDefinitionRow;

/// Column list for `gjbpdef` queries.
const COLUMNS: &str = "gjbpdef_job, gjbpdef_number, gjbpdef_single_ind";

pub struct ParameterDefinitionRepo;

impl ParameterDefinitionRepo {
    /// All definitions for a job, ordered by parameter number.
    pub async fn list_for_job(
        conn: &mut PgConnection,
        job: &str,
    ) -> Result<Vec<ParameterDefinitionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM gjbpdef WHERE gjbpdef_job = $1 ORDER BY gjbpdef_number"
        );
        sqlx::query_as::<_, ParameterDefinitionRow>(&query)
            .bind(job)
            .fetch_all(conn)
            .await
    }
}
