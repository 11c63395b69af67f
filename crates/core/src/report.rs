//! Report framing: page header, parameter control page and footer.
//!
//! Header templates use FormatR-style pictures. The only field supported is
//! the page number, written as `@<<<` (left-aligned, four columns). A line
//! consisting solely of `PAGE_NUMBER` is the picture's variable list and is
//! not printed.

use crate::parameters::ParameterSet;
use crate::types::Timestamp;

/// Picture field replaced by the page number.
pub const PAGE_NUMBER_FIELD: &str = "@<<<";

const PAGE_NUMBER_VARIABLE: &str = "PAGE_NUMBER";
const INSTITUTION_WIDTH: usize = 110;
const TITLE_WIDTH: usize = 132;
const NAME_COLUMN_WIDTH: usize = 24;
const COLUMN_GAP: &str = "          ";

/// Build the default header used when no header template is configured.
pub fn default_header(now: Timestamp, institution: &str, job: &str, title: &str) -> String {
    let stamp = now.format("%d-%b-%Y %I:%M %p").to_string().to_uppercase();
    format!(
        "{stamp} {institution:^iw$} PAGE: {field}\n{variable}\n{job} {title:^tw$}\n",
        iw = INSTITUTION_WIDTH,
        tw = TITLE_WIDTH,
        field = PAGE_NUMBER_FIELD,
        variable = PAGE_NUMBER_VARIABLE,
    )
}

/// Renders the header, control page and footer of a job's report.
#[derive(Debug, Clone)]
pub struct ReportFormatter {
    header: String,
    footer: String,
}

impl ReportFormatter {
    pub fn new(header: impl Into<String>, footer: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            footer: footer.into(),
        }
    }

    pub fn header_template(&self) -> &str {
        &self.header
    }

    pub fn footer(&self) -> &str {
        &self.footer
    }

    /// Header with the page number filled in.
    pub fn header(&self, page: &str) -> String {
        let field = format!("{page:<width$}", width = PAGE_NUMBER_FIELD.len());
        let mut rendered = String::with_capacity(self.header.len());
        for line in self.header.lines() {
            if line.trim() == PAGE_NUMBER_VARIABLE {
                continue;
            }
            rendered.push_str(&line.replace(PAGE_NUMBER_FIELD, &field));
            rendered.push('\n');
        }
        rendered
    }

    /// Header followed by one line per parameter, in schema order.
    pub fn control_page(&self, parameters: &ParameterSet, page: &str) -> String {
        let mut rendered = self.header(page);
        rendered.push_str(&format!(
            "{:<width$}{COLUMN_GAP}Parameter Value\n",
            "Parameter Name",
            width = NAME_COLUMN_WIDTH
        ));
        rendered.push_str(&format!(
            "{}{COLUMN_GAP}{}\n",
            "-".repeat(NAME_COLUMN_WIDTH),
            "-".repeat(15)
        ));
        for (name, value) in parameters.iter() {
            let name: String = name.chars().take(NAME_COLUMN_WIDTH).collect();
            rendered.push_str(&format!(
                "{name:<width$}{COLUMN_GAP}{value}\n",
                width = NAME_COLUMN_WIDTH
            ));
        }
        rendered
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
