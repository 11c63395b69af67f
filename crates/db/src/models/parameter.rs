//! Parameter definition (`gjbpdef`) and run archive (`gjbprun`) rows.

use jobsub_core::error::CoreError;
use jobsub_core::parameters::{Cardinality, ParameterDefinition, RunArchiveEntry};
use jobsub_core::types::{OneUpNo, ParamNumber};
use sqlx::FromRow;

/// A row from the `gjbpdef` table.
#[derive(Debug, Clone, FromRow)]
pub struct ParameterDefinitionRow {
    pub gjbpdef_job: String,
    pub gjbpdef_number: ParamNumber,
    /// `S` for a single value, `M` for multiple.
    pub gjbpdef_single_ind: String,
}

impl TryFrom<ParameterDefinitionRow> for ParameterDefinition {
    type Error = CoreError;

    fn try_from(row: ParameterDefinitionRow) -> Result<Self, Self::Error> {
        Ok(ParameterDefinition {
            number: row.gjbpdef_number,
            cardinality: Cardinality::from_indicator(&row.gjbpdef_single_ind)?,
        })
    }
}

/// A row from the `gjbprun` table.
#[derive(Debug, Clone, FromRow)]
pub struct RunParameterRow {
    pub gjbprun_job: String,
    pub gjbprun_one_up_no: OneUpNo,
    pub gjbprun_number: ParamNumber,
    pub gjbprun_value: Option<String>,
}

impl From<RunParameterRow> for RunArchiveEntry {
    /// A NULL value replays as an empty string.
    fn from(row: RunParameterRow) -> Self {
        RunArchiveEntry::new(row.gjbprun_number, row.gjbprun_value.unwrap_or_default())
    }
}
