//! Extraction configuration: display-title overrides and column layout.

use crate::{Error, Result};
use std::collections::BTreeMap;
use std::path::Path;

/// Maps raw worksheet names to corrected display titles.
///
/// Excel caps sheet names at 31 characters, so long office titles arrive
/// truncated and need restoring before they are shown or slugified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleOverrides {
    titles: BTreeMap<String, String>,
}

impl TitleOverrides {
    /// Create an empty override table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The overrides for the titles known to be truncated in the candidate
    /// workbook.
    pub fn builtin() -> Self {
        Self::new()
            .with_title(
                "Vice President of Internal Affa",
                "Vice President of Internal Affairs",
            )
            .with_title(
                "International Student Affairs O",
                "International Student Affairs Officer",
            )
    }

    /// Add or replace an override.
    pub fn with_title(mut self, sheet: impl Into<String>, title: impl Into<String>) -> Self {
        self.insert(sheet, title);
        self
    }

    /// Add or replace an override in place.
    pub fn insert(&mut self, sheet: impl Into<String>, title: impl Into<String>) {
        self.titles.insert(sheet.into(), title.into());
    }

    /// Merge another table into this one; entries from `other` win.
    pub fn extend(&mut self, other: TitleOverrides) {
        self.titles.extend(other.titles);
    }

    /// Parse a `SHEET=TITLE` assignment, as given on the command line.
    pub fn parse_assignment(assignment: &str) -> Result<(String, String)> {
        let (sheet, title) = assignment.split_once('=').ok_or_else(|| {
            Error::InvalidConfig(format!(
                "title override '{}' must look like SHEET=TITLE",
                assignment
            ))
        })?;
        if sheet.is_empty() || title.trim().is_empty() {
            return Err(Error::InvalidConfig(format!(
                "title override '{}' has an empty sheet name or title",
                assignment
            )));
        }
        Ok((sheet.to_string(), title.trim().to_string()))
    }

    /// Load overrides from a JSON object of `{ "sheet name": "title" }`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let titles: BTreeMap<String, String> = serde_json::from_str(json)?;
        Ok(Self { titles })
    }

    /// Load overrides from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        log::debug!("Loaded title overrides from {}", path.display());
        Self::from_json_str(&content)
    }

    /// The display title for a sheet: its override, or the sheet name itself.
    pub fn title_for<'a>(&'a self, sheet: &'a str) -> &'a str {
        self.titles.get(sheet).map(String::as_str).unwrap_or(sheet)
    }

    /// Number of overrides.
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    /// Whether there are no overrides.
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

/// Which spreadsheet columns hold the candidate fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    name: String,
    statement: String,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            name: "A".to_string(),
            statement: "C".to_string(),
        }
    }
}

impl ColumnLayout {
    /// Create a layout with the default columns (name in A, statement in C).
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different column for candidate names.
    pub fn with_name_column(mut self, column: &str) -> Result<Self> {
        self.name = parse_column(column)?;
        Ok(self)
    }

    /// Use a different column for candidate statements.
    pub fn with_statement_column(mut self, column: &str) -> Result<Self> {
        self.statement = parse_column(column)?;
        Ok(self)
    }

    /// Column letter holding the candidate name.
    pub fn name_column(&self) -> &str {
        &self.name
    }

    /// Column letter holding the candidate statement.
    pub fn statement_column(&self) -> &str {
        &self.statement
    }
}

/// Validate a column reference like `c` or `AB`, returning it uppercased.
fn parse_column(column: &str) -> Result<String> {
    let column = column.trim();
    if column.is_empty() || !column.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(Error::InvalidConfig(format!(
            "'{}' is not a column letter",
            column
        )));
    }
    Ok(column.to_ascii_uppercase())
}
