//! Job parameter schema and values.
//!
//! Parameter numbers are 1-based in the database and 0-based positions in
//! the caller's list of declared names: definition `n` is named
//! `names[n - 1]`. A [`ParameterSet`] is assembled by exactly one source
//! through a [`ParameterSetBuilder`] and is immutable afterwards.

pub mod archive;
pub mod file;
pub mod prompt;
pub mod resolver;

use std::collections::HashSet;
use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::CoreError;
use crate::types::ParamNumber;

pub use archive::{ArchiveReplay, RunArchiveEntry};
pub use prompt::{LinePrompter, Prompter};
pub use resolver::{ParameterResolver, ParameterSource, ResolvedParameters};

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Whether a parameter takes one value or an ordered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Single,
    Multiple,
}

impl Cardinality {
    /// Parse the schema's single/multiple indicator (`S` or `M`).
    pub fn from_indicator(indicator: &str) -> Result<Self, CoreError> {
        match indicator.trim() {
            "S" => Ok(Self::Single),
            "M" => Ok(Self::Multiple),
            other => Err(CoreError::Validation(format!(
                "unknown parameter cardinality indicator '{other}'"
            ))),
        }
    }
}

/// One row of a job's declared parameter schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterDefinition {
    pub number: ParamNumber,
    pub cardinality: Cardinality,
}

/// A parameter definition bound to its caller-declared name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaEntry {
    pub number: ParamNumber,
    pub name: String,
    pub cardinality: Cardinality,
}

/// A job's parameter definitions paired with the declared names.
#[derive(Debug, Clone)]
pub struct ParameterSchema {
    job: String,
    declared: usize,
    entries: Vec<SchemaEntry>,
}

impl ParameterSchema {
    /// Bind `definitions` (ordered by number) to the declared `names`.
    pub fn new(
        job: &str,
        names: &[String],
        definitions: &[ParameterDefinition],
    ) -> Result<Self, CoreError> {
        let mut seen = HashSet::with_capacity(names.len());
        if let Some(repeated) = names.iter().find(|name| !seen.insert(name.as_str())) {
            return Err(CoreError::Validation(format!(
                "job {job} declares parameter name {repeated} more than once"
            )));
        }

        let mut entries = Vec::with_capacity(definitions.len());
        for definition in definitions {
            let name = usize::try_from(definition.number)
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|index| names.get(index))
                .ok_or_else(|| {
                    CoreError::Validation(format!(
                        "job {job} defines parameter number {} but only {} parameter names were declared",
                        definition.number,
                        names.len()
                    ))
                })?;
            entries.push(SchemaEntry {
                number: definition.number,
                name: name.clone(),
                cardinality: definition.cardinality,
            });
        }
        Ok(Self {
            job: job.to_string(),
            declared: names.len(),
            entries,
        })
    }

    pub fn job(&self) -> &str {
        &self.job
    }

    /// Number of parameter names the caller declared.
    pub fn declared_count(&self) -> usize {
        self.declared
    }

    pub fn entries(&self) -> &[SchemaEntry] {
        &self.entries
    }

    /// Position of the definition with this number.
    pub fn position_of_number(&self, number: ParamNumber) -> Option<usize> {
        self.entries.iter().position(|entry| entry.number == number)
    }

    /// Position of the definition bound to this name.
    pub fn position_of_name(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.name == name)
    }
}

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

/// A resolved parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterValue {
    /// A single value; `None` until a source supplies one.
    Single(Option<String>),
    /// An ordered list of values.
    Multiple(Vec<String>),
}

impl ParameterValue {
    /// The starting value for a parameter of this cardinality.
    pub fn empty(cardinality: Cardinality) -> Self {
        match cardinality {
            Cardinality::Single => Self::Single(None),
            Cardinality::Multiple => Self::Multiple(Vec::new()),
        }
    }

    pub fn as_single(&self) -> Option<&str> {
        match self {
            Self::Single(value) => value.as_deref(),
            Self::Multiple(_) => None,
        }
    }

    pub fn as_multiple(&self) -> Option<&[String]> {
        match self {
            Self::Single(_) => None,
            Self::Multiple(values) => Some(values),
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(value) => f.write_str(value.as_deref().unwrap_or("")),
            Self::Multiple(values) => f.write_str(&values.join(",")),
        }
    }
}

impl Serialize for ParameterValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Single(value) => value.serialize(serializer),
            Self::Multiple(values) => values.serialize(serializer),
        }
    }
}

/// Resolved values keyed by parameter name, in schema order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSet {
    entries: Vec<(String, ParameterValue)>,
}

impl ParameterSet {
    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl Serialize for ParameterSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Accumulates values for one [`ParameterSet`].
///
/// Starts with every declared parameter at its empty value; positions match
/// [`ParameterSchema::entries`].
#[derive(Debug, Clone)]
pub struct ParameterSetBuilder {
    entries: Vec<(String, ParameterValue)>,
}

impl ParameterSetBuilder {
    pub fn new(schema: &ParameterSchema) -> Self {
        let entries = schema
            .entries()
            .iter()
            .map(|entry| (entry.name.clone(), ParameterValue::empty(entry.cardinality)))
            .collect();
        Self { entries }
    }

    /// Record one value at `position`: a Single value is overwritten, a
    /// Multiple value is appended to.
    pub fn push(&mut self, position: usize, value: String) {
        if let Some((_, slot)) = self.entries.get_mut(position) {
            match slot {
                ParameterValue::Single(current) => *current = Some(value),
                ParameterValue::Multiple(values) => values.push(value),
            }
        }
    }

    /// Replace the value at `position` wholesale.
    pub fn replace(&mut self, position: usize, value: ParameterValue) {
        if let Some((_, slot)) = self.entries.get_mut(position) {
            *slot = value;
        }
    }

    pub fn build(self) -> ParameterSet {
        ParameterSet {
            entries: self.entries,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
