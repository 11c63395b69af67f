//! Repository for the `gubinst` institution row.

use sqlx::PgConnection;

use crate::models::institution::{Institution, INSTITUTION_KEY};

/// Column list for `gubinst` queries.
const COLUMNS: &str = "gubinst_key, gubinst_name";

pub struct InstitutionRepo;

impl InstitutionRepo {
    /// Name of the institution, printed in report headers.
    pub async fn find_name(conn: &mut PgConnection) -> Result<String, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM gubinst WHERE gubinst_key = $1");
        let institution = sqlx::query_as::<_, Institution>(&query)
            .bind(INSTITUTION_KEY)
            .fetch_one(conn)
            .await?;
        Ok(institution.gubinst_name)
    }
}
