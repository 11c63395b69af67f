//! Replay of a prior run's archived parameter values.

use crate::error::CoreError;
use crate::types::{OneUpNo, ParamNumber, PAGE_LENGTH_PARAM};

use super::{ParameterSchema, ParameterSet, ParameterSetBuilder};

/// One archived value of a prior run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunArchiveEntry {
    pub number: ParamNumber,
    pub value: String,
}

impl RunArchiveEntry {
    pub fn new(number: ParamNumber, value: impl Into<String>) -> Self {
        Self {
            number,
            value: value.into(),
        }
    }
}

/// Parameters rebuilt from the archive, plus the page-length override if
/// the run recorded one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveReplay {
    pub parameters: ParameterSet,
    pub page_length: Option<u32>,
}

/// Rebuild a parameter set from archived `rows` (ordered by number).
///
/// Validates every row before returning, so a failure here leaves the
/// archive untouched.
pub fn replay(
    schema: &ParameterSchema,
    one_up: OneUpNo,
    rows: &[RunArchiveEntry],
) -> Result<ArchiveReplay, CoreError> {
    let job = schema.job();
    if rows.is_empty() {
        return Err(CoreError::Validation(format!(
            "Unable to validate one up #{one_up} with job {job}."
        )));
    }

    let mut builder = ParameterSetBuilder::new(schema);
    let mut page_length = None;

    for row in rows {
        if row.number == PAGE_LENGTH_PARAM {
            let parsed = row.value.trim().parse::<u32>().map_err(|_| {
                CoreError::Validation(format!(
                    "one up #{one_up} for job {job} has a non-numeric page length '{}'",
                    row.value
                ))
            })?;
            page_length = Some(parsed);
            continue;
        }

        let declared = usize::try_from(row.number)
            .ok()
            .filter(|n| (1..=schema.declared_count()).contains(n));
        if declared.is_none() {
            return Err(CoreError::Validation(format!(
                "one up #{one_up} for job {job}: parameter number {} greater than declared parameter list",
                row.number
            )));
        }

        let position = schema.position_of_number(row.number).ok_or_else(|| {
            CoreError::Validation(format!(
                "one up #{one_up} for job {job}: parameter number {} has no definition",
                row.number
            ))
        })?;
        builder.push(position, row.value.clone());
    }

    Ok(ArchiveReplay {
        parameters: builder.build(),
        page_length,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
