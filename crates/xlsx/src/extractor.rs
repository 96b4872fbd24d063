//! Candidate extraction: joins worksheet rows with anchored pictures.

use crate::drawing::{find_drawing_part, load_anchor_map, AnchorMap};
use crate::package::Package;
use crate::rows::{read_rows, RawRow};
use crate::shared_strings::SharedStrings;
use crate::workbook::{load_sheet_targets, SheetTarget};
use ballot_core::{
    headshot_file_name, Ballot, Candidate, ColumnLayout, HeadshotSink, Position, Result,
    TitleOverrides,
};
use std::io::{Read, Seek};
use std::path::Path;

/// Settings for one extraction run.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    titles: TitleOverrides,
    columns: ColumnLayout,
}

impl ExtractOptions {
    /// Default columns and no title overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use these display-title overrides.
    pub fn with_titles(mut self, titles: TitleOverrides) -> Self {
        self.titles = titles;
        self
    }

    /// Read candidate fields from these columns.
    pub fn with_columns(mut self, columns: ColumnLayout) -> Self {
        self.columns = columns;
        self
    }

    pub fn titles(&self) -> &TitleOverrides {
        &self.titles
    }

    pub fn columns(&self) -> &ColumnLayout {
        &self.columns
    }
}

/// Extracts positions and candidates from an election workbook.
///
/// Each worksheet is one position. Its first row is a header; every later row
/// with a non-blank name is a candidate, and a picture anchored to that row is
/// the candidate's headshot.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    options: ExtractOptions,
}

impl Extractor {
    /// Create an extractor with the given options.
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    /// Open the workbook at `path` and extract it.
    ///
    /// The package is closed when this returns, whether or not extraction
    /// succeeded.
    pub fn extract_file<S: HeadshotSink>(&self, path: &Path, sink: &mut S) -> Result<Ballot> {
        let mut package = Package::open(path)?;
        log::debug!("Opened {}", path.display());
        self.extract(&mut package, sink)
    }

    /// Extract every position from an open package.
    pub fn extract<R: Read + Seek, S: HeadshotSink>(
        &self,
        package: &mut Package<R>,
        sink: &mut S,
    ) -> Result<Ballot> {
        let (sheets, workbook_rels) = load_sheet_targets(package)?;
        let shared = SharedStrings::load(package, &workbook_rels)?;

        let mut ballot = Ballot::new();
        for sheet in &sheets {
            if let Some(position) = self.extract_sheet(package, sheet, &shared, sink)? {
                ballot.add_position(position);
            }
        }

        log::info!(
            "Extracted {} positions with {} candidates from {} sheets",
            ballot.positions.len(),
            ballot.candidate_count(),
            sheets.len()
        );
        Ok(ballot)
    }

    /// Extract one worksheet. Sheets without any rows yield no position.
    fn extract_sheet<R: Read + Seek, S: HeadshotSink>(
        &self,
        package: &mut Package<R>,
        sheet: &SheetTarget,
        shared: &SharedStrings,
        sink: &mut S,
    ) -> Result<Option<Position>> {
        let anchors = match find_drawing_part(package, &sheet.path)? {
            Some(drawing) => load_anchor_map(package, &drawing)?,
            None => AnchorMap::new(),
        };

        let xml = package.read_xml(&sheet.path)?;
        let rows = read_rows(&xml, &sheet.path, shared)?;
        let Some((header, data)) = rows.split_first() else {
            log::debug!("Sheet {:?} has no rows; skipping", sheet.name);
            return Ok(None);
        };
        log::debug!(
            "Sheet {:?}: header row {} with {} cells, {} data rows, {} pictures",
            sheet.name,
            header.index,
            header.cells.len(),
            data.len(),
            anchors.len()
        );

        let title = self.options.titles.title_for(&sheet.name);
        let mut position = Position::new(title, sheet.name.as_str());

        for row in data {
            let Some(mut candidate) = self.candidate_from_row(row) else {
                continue;
            };
            if let Some(image) = anchors.image_for_row(row.index) {
                let bytes = package.read(image)?;
                let file_name = headshot_file_name(&position.slug, &candidate.name, row.index, image);
                let stored = sink.store(&file_name, &bytes)?;
                candidate = candidate.with_headshot(stored);
            }
            position.add_candidate(candidate);
        }

        Ok(Some(position))
    }

    /// Build a candidate from a data row, or `None` when the name is blank.
    fn candidate_from_row(&self, row: &RawRow) -> Option<Candidate> {
        let columns = &self.options.columns;
        let name = row.get(columns.name_column()).unwrap_or_default().trim();
        let statement = row
            .get(columns.statement_column())
            .unwrap_or_default()
            .replace('\t', " ");
        Candidate::new(name, statement.trim())
    }
}
