//! Domain types for representing extracted election data.

use serde::{Deserialize, Serialize};

/// The full extraction result: every position found in the workbook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    /// Positions in workbook sheet order.
    pub positions: Vec<Position>,
}

impl Ballot {
    /// Create an empty ballot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a position to the ballot.
    pub fn add_position(&mut self, position: Position) {
        self.positions.push(position);
    }

    /// Total number of candidates across all positions.
    pub fn candidate_count(&self) -> usize {
        self.positions.iter().map(|p| p.candidates.len()).sum()
    }
}

/// One electable office, extracted from one worksheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Display title (the sheet name, or its override).
    pub title: String,

    /// Slug derived from the title.
    pub slug: String,

    /// Raw worksheet name as declared in the workbook.
    pub sheet: String,

    /// Candidates in sheet row order.
    pub candidates: Vec<Candidate>,
}

impl Position {
    /// Create a position with no candidates. The slug is derived from `title`.
    pub fn new(title: impl Into<String>, sheet: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            slug: crate::slugify(&title),
            title,
            sheet: sheet.into(),
            candidates: Vec::new(),
        }
    }

    /// Append a candidate, keeping row order.
    pub fn add_candidate(&mut self, candidate: Candidate) {
        self.candidates.push(candidate);
    }
}

/// A single named entrant for a position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Candidate name. Never empty.
    pub name: String,

    /// Personal statement. May be empty.
    pub statement: String,

    /// Path of the extracted headshot image, if the row had one.
    pub headshot: Option<String>,
}

impl Candidate {
    /// Create a candidate without a headshot.
    ///
    /// Returns `None` when the name is empty or whitespace only; such rows are
    /// not candidates.
    pub fn new(name: impl Into<String>, statement: impl Into<String>) -> Option<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return None;
        }
        Some(Self {
            name,
            statement: statement.into(),
            headshot: None,
        })
    }

    /// Attach a headshot path.
    pub fn with_headshot(mut self, headshot: impl Into<String>) -> Self {
        self.headshot = Some(headshot.into());
        self
    }
}
