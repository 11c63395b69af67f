//! Interactive parameter entry.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::error::CoreError;

use super::{Cardinality, ParameterSchema, ParameterSet, ParameterSetBuilder, ParameterValue};

/// Source of interactively entered values.
pub trait Prompter {
    /// Ask for the value of `name` and return the raw line without its
    /// line terminator.
    fn prompt(&mut self, name: &str) -> Result<String, CoreError>;
}

/// Prompts on a writer and reads answers line by line from a reader.
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl LinePrompter<std::io::StdinLock<'static>, std::io::Stdout> {
    /// Prompt on the terminal.
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn prompt(&mut self, name: &str) -> Result<String, CoreError> {
        let stdio_error = |source: std::io::Error| CoreError::Io {
            path: PathBuf::from("<stdin>"),
            source,
        };

        write!(self.output, "Value for {name}: ").map_err(stdio_error)?;
        self.output.flush().map_err(stdio_error)?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(stdio_error)?;
        if read == 0 {
            return Err(CoreError::Validation(format!(
                "input ended before a value for {name} was entered"
            )));
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(line)
    }
}

/// Split a raw Multiple answer on commas.
///
/// Empty input yields an empty list and trailing empty fields are dropped
/// (`"a,b,"` gives `["a", "b"]`); empty fields between commas are kept.
pub fn split_multiple(raw: &str) -> Vec<String> {
    let mut values: Vec<String> = raw.split(',').map(str::to_string).collect();
    while values.last().is_some_and(|value| value.is_empty()) {
        values.pop();
    }
    values
}

/// Prompt for every declared parameter in schema order.
pub fn collect<P: Prompter + ?Sized>(
    schema: &ParameterSchema,
    prompter: &mut P,
) -> Result<ParameterSet, CoreError> {
    let mut builder = ParameterSetBuilder::new(schema);
    for (position, entry) in schema.entries().iter().enumerate() {
        let raw = prompter.prompt(&entry.name)?;
        let value = match entry.cardinality {
            Cardinality::Single => ParameterValue::Single(Some(raw)),
            Cardinality::Multiple => ParameterValue::Multiple(split_multiple(&raw)),
        };
        builder.replace(position, value);
    }
    Ok(builder.build())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use assert_matches::assert_matches;

    use super::*;
    use crate::test_helpers::{definitions, names};

    #[test]
    fn split_keeps_order() {
        assert_eq!(split_multiple("a,b,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn split_empty_input_is_empty_list() {
        assert!(split_multiple("").is_empty());
    }

    #[test]
    fn split_drops_only_trailing_empty_fields() {
        assert_eq!(split_multiple("a,,b,,"), vec!["a", "", "b"]);
        assert_eq!(split_multiple(",a"), vec!["", "a"]);
    }

    #[test]
    fn collects_every_parameter_in_order() {
        let schema = ParameterSchema::new(
            "GLBDATA",
            &names(&["term", "campus", "note"]),
            &definitions(&[Cardinality::Single, Cardinality::Multiple, Cardinality::Single]),
        )
        .unwrap();
        let mut output = Vec::new();
        let mut prompter = LinePrompter::new(Cursor::new("202410\nM,W\n\n"), &mut output);

        let set = collect(&schema, &mut prompter).unwrap();

        assert_eq!(set.get("term").and_then(ParameterValue::as_single), Some("202410"));
        assert_eq!(
            set.get("campus"),
            Some(&ParameterValue::Multiple(vec!["M".into(), "W".into()]))
        );
        // Empty input is stored as-is for a Single parameter.
        assert_eq!(set.get("note").and_then(ParameterValue::as_single), Some(""));

        let shown = String::from_utf8(output).expect("utf8 prompt output");
        assert_eq!(shown, "Value for term: Value for campus: Value for note: ");
    }

    #[test]
    fn crlf_terminators_are_stripped() {
        let mut prompter = LinePrompter::new(Cursor::new("abc\r\n"), Vec::new());
        assert_eq!(prompter.prompt("x").unwrap(), "abc");
    }

    #[test]
    fn end_of_input_is_an_error() {
        let mut prompter = LinePrompter::new(Cursor::new(""), Vec::new());
        assert_matches!(prompter.prompt("term"), Err(CoreError::Validation(_)));
    }
}
