//! Parameter values read from a per-job YAML file.
//!
//! The file is named after the lower-cased job name (`glbdata.yaml`) and
//! maps parameter names to a scalar or a list of scalars:
//!
//! ```yaml
//! term: "202410"
//! campus: [M, W]
//! ```
//!
//! Cardinality is taken from the file as written; it is not checked against
//! the schema.

use std::path::{Path, PathBuf};

use serde_yaml::Value;

use crate::error::CoreError;

use super::{ParameterSchema, ParameterSet, ParameterSetBuilder, ParameterValue};

/// File name holding replay values for `job` in the working directory.
pub fn parameter_file_name(job: &str) -> String {
    format!("{}.yaml", job.to_lowercase())
}

/// Path of `job`'s parameter file under `working_dir`.
pub fn parameter_file_path(working_dir: &Path, job: &str) -> PathBuf {
    working_dir.join(parameter_file_name(job))
}

/// Read and apply the parameter file at `path`.
pub fn load(schema: &ParameterSchema, path: &Path) -> Result<ParameterSet, CoreError> {
    let content = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(schema, &content, path)
}

/// Apply parameter file `content`. `path` is only used in error messages.
pub fn parse(schema: &ParameterSchema, content: &str, path: &Path) -> Result<ParameterSet, CoreError> {
    let mut builder = ParameterSetBuilder::new(schema);
    if content.trim().is_empty() {
        return Ok(builder.build());
    }

    let document: Value = serde_yaml::from_str(content).map_err(|source| CoreError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let mapping = match document {
        Value::Mapping(mapping) => mapping,
        Value::Null => return Ok(builder.build()),
        _ => {
            return Err(CoreError::Validation(format!(
                "{} must map parameter names to values",
                path.display()
            )))
        }
    };

    for (key, value) in mapping {
        let name = scalar_to_string(&key).ok_or_else(|| {
            CoreError::Validation(format!("{} has a non-scalar parameter name", path.display()))
        })?;
        let Some(position) = schema.position_of_name(&name) else {
            tracing::warn!(
                job = schema.job(),
                parameter = %name,
                path = %path.display(),
                "Ignoring undeclared parameter in parameter file"
            );
            continue;
        };
        builder.replace(position, to_parameter_value(&name, value, path)?);
    }

    Ok(builder.build())
}

fn to_parameter_value(name: &str, value: Value, path: &Path) -> Result<ParameterValue, CoreError> {
    match value {
        Value::Null => Ok(ParameterValue::Single(None)),
        Value::Sequence(items) => items
            .iter()
            .map(|item| {
                if item.is_null() {
                    Ok(String::new())
                } else {
                    scalar_to_string(item).ok_or_else(|| unsupported(name, path))
                }
            })
            .collect::<Result<Vec<_>, _>>()
            .map(ParameterValue::Multiple),
        other => scalar_to_string(&other)
            .map(|value| ParameterValue::Single(Some(value)))
            .ok_or_else(|| unsupported(name, path)),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn unsupported(name: &str, path: &Path) -> CoreError {
    CoreError::Validation(format!(
        "parameter {name} in {} must be a scalar or a list of scalars",
        path.display()
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
