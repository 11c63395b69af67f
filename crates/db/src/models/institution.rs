use sqlx::FromRow;

/// Key of the single institution row in `gubinst`.
pub const INSTITUTION_KEY: &str = "INST";

/// A row from the `gubinst` table.
#[derive(Debug, Clone, FromRow)]
pub struct Institution {
    pub gubinst_key: String,
    pub gubinst_name: String,
}
