//! Worksheet row reading.

use crate::shared_strings::SharedStrings;
use crate::xml::{local_name, PartReader};
use ballot_core::{Error, Result};
use quick_xml::events::Event;
use std::collections::BTreeMap;

/// One worksheet row: its 1-based index and the cells that carry a value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based row number from the sheet.
    pub index: u32,

    /// Column letter → raw cell text. Cells without a `<v>` are absent.
    pub cells: BTreeMap<String, String>,
}

impl RawRow {
    /// The value in `column`, if the cell had one.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }
}

/// Column letters of a cell reference (`AB12` → `AB`).
pub fn column_letters(cell_ref: &str) -> &str {
    let end = cell_ref
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(cell_ref.len());
    &cell_ref[..end]
}

/// A `<c>` element being read.
#[derive(Debug, Default)]
struct PendingCell {
    reference: String,
    shared: bool,
    value: Option<String>,
}

/// Read every row of a worksheet document, in document order.
///
/// Shared-string cells (`t="s"`) are replaced by their table entry; a
/// non-numeric or out-of-range index is an error. All other cells keep their
/// raw `<v>` text.
pub fn read_rows(xml: &str, part: &str, shared: &SharedStrings) -> Result<Vec<RawRow>> {
    let mut reader = PartReader::new(xml, part);
    let mut rows = Vec::new();

    let mut current: Option<RawRow> = None;
    let mut cell: Option<PendingCell> = None;
    let mut in_value = false;
    let mut last_index = 0u32;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => match local_name(e.name().as_ref()) {
                b"row" => {
                    let index = row_index(&reader, reader.attr(e, b"r")?, last_index)?;
                    last_index = index;
                    current = Some(RawRow {
                        index,
                        ..Default::default()
                    });
                }
                b"c" if current.is_some() => {
                    cell = Some(PendingCell {
                        reference: reader.attr(e, b"r")?.unwrap_or_default(),
                        shared: reader.attr(e, b"t")?.as_deref() == Some("s"),
                        value: None,
                    });
                }
                b"v" => {
                    if let Some(cell) = cell.as_mut() {
                        cell.value = Some(String::new());
                        in_value = true;
                    }
                }
                _ => {}
            },
            Event::Empty(ref e) => match local_name(e.name().as_ref()) {
                b"row" => {
                    let index = row_index(&reader, reader.attr(e, b"r")?, last_index)?;
                    last_index = index;
                    rows.push(RawRow {
                        index,
                        ..Default::default()
                    });
                }
                b"v" => {
                    if let Some(cell) = cell.as_mut() {
                        cell.value = Some(String::new());
                    }
                }
                _ => {}
            },
            Event::Text(ref t) if in_value => {
                if let Some(value) = cell.as_mut().and_then(|c| c.value.as_mut()) {
                    value.push_str(&reader.text(t)?);
                }
            }
            Event::End(ref e) => match local_name(e.name().as_ref()) {
                b"v" => in_value = false,
                b"c" => {
                    if let (Some(done), Some(row)) = (cell.take(), current.as_mut()) {
                        store_cell(done, row, shared)?;
                    }
                }
                b"row" => {
                    if let Some(row) = current.take() {
                        rows.push(row);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    log::debug!("Read {} rows from {}", rows.len(), part);
    Ok(rows)
}

/// The row's `r` attribute, or the row after the previous one when absent.
fn row_index(reader: &PartReader<'_>, r: Option<String>, last_index: u32) -> Result<u32> {
    match r {
        Some(r) => r
            .trim()
            .parse()
            .map_err(|_| reader.error(format!("invalid row number '{}'", r))),
        None => last_index
            .checked_add(1)
            .ok_or_else(|| reader.error("row number out of range".to_string())),
    }
}

fn store_cell(cell: PendingCell, row: &mut RawRow, shared: &SharedStrings) -> Result<()> {
    let Some(raw) = cell.value else {
        return Ok(());
    };
    let column = column_letters(&cell.reference);
    if column.is_empty() {
        return Ok(());
    }

    let value = if cell.shared {
        let index: usize = raw.trim().parse().map_err(|_| Error::InvalidSharedStringIndex {
            cell: cell.reference.clone(),
            value: raw.clone(),
        })?;
        shared
            .get(index)
            .ok_or_else(|| Error::SharedStringOutOfRange {
                cell: cell.reference.clone(),
                index,
                len: shared.len(),
            })?
            .to_string()
    } else {
        raw
    };

    row.cells.insert(column.to_string(), value);
    Ok(())
}
