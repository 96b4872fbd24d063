//! Worksheet drawings: finding a sheet's drawing and mapping its picture
//! anchors to sheet rows.
//!
//! Drawing anchors count rows from zero while worksheet rows count from one.
//! [`AnchorMap`] is keyed by worksheet row; the conversion happens in
//! [`sheet_row_for_anchor`] and nowhere else.

use crate::package::Package;
use crate::rels::{rel_types, Relationships};
use crate::xml::{local_name, PartReader};
use ballot_core::Result;
use quick_xml::events::{BytesStart, Event};
use std::collections::BTreeMap;
use std::io::{Read, Seek};

/// Convert a zero-based drawing anchor row to the 1-based worksheet row.
///
/// `None` when the worksheet row would not fit in a `u32`.
pub fn sheet_row_for_anchor(anchor_row: u32) -> Option<u32> {
    anchor_row.checked_add(1)
}

/// Worksheet row (1-based) → package path of the picture anchored there.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnchorMap {
    images: BTreeMap<u32, String>,
}

impl AnchorMap {
    /// An empty map, for sheets without a drawing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a picture anchored at a zero-based drawing row.
    ///
    /// A later picture on the same row replaces an earlier one. Returns the
    /// worksheet row, or `None` (and records nothing) when the anchor row has
    /// no worksheet counterpart.
    pub fn insert_anchor(&mut self, anchor_row: u32, image: String) -> Option<u32> {
        let row = sheet_row_for_anchor(anchor_row)?;
        if let Some(previous) = self.images.insert(row, image) {
            log::debug!("Row {} has several pictures; {} replaced", row, previous);
        }
        Some(row)
    }

    /// The picture for a 1-based worksheet row.
    pub fn image_for_row(&self, row: u32) -> Option<&str> {
        self.images.get(&row).map(String::as_str)
    }

    /// Number of rows with a picture.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether no rows have a picture.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Package path of the drawing attached to a worksheet, if it has one.
pub fn find_drawing_part<R: Read + Seek>(
    package: &mut Package<R>,
    sheet_path: &str,
) -> Result<Option<String>> {
    let rels = Relationships::load(package, sheet_path)?;
    Ok(rels.resolve_type(rel_types::DRAWING))
}

/// Load a drawing part and map its picture anchors to worksheet rows.
pub fn load_anchor_map<R: Read + Seek>(
    package: &mut Package<R>,
    drawing_path: &str,
) -> Result<AnchorMap> {
    let rels = Relationships::load(package, drawing_path)?;
    let xml = package.read_xml(drawing_path)?;
    let anchors = parse_anchors(&xml, drawing_path, &rels)?;
    log::debug!("{} anchors {} pictures to rows", drawing_path, anchors.len());
    Ok(anchors)
}

/// What has been seen inside one top-level anchor element.
#[derive(Debug, Default)]
struct AnchorState {
    row_text: Option<String>,
    has_pic: bool,
    embed: Option<String>,
}

/// Parse a spreadsheet drawing, resolving picture embeds through `rels`.
///
/// Only pictures that are direct children of a top-level anchor with a
/// `from` position count; grouped shapes, charts and absolute anchors are
/// ignored.
pub fn parse_anchors(xml: &str, part: &str, rels: &Relationships) -> Result<AnchorMap> {
    let mut reader = PartReader::new(xml, part);
    let mut map = AnchorMap::new();

    let mut anchor: Option<AnchorState> = None;
    let mut in_from = false;
    let mut in_row = false;
    let mut in_pic = false;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => {
                let qname = e.name();
                let name = local_name(qname.as_ref());
                match (reader.depth(), name) {
                    (2, _) => anchor = Some(AnchorState::default()),
                    (3, b"from") => in_from = true,
                    (3, b"pic") => {
                        in_pic = true;
                        if let Some(state) = anchor.as_mut() {
                            state.has_pic = true;
                        }
                    }
                    (4, b"row") if in_from => {
                        in_row = true;
                        if let Some(state) = anchor.as_mut() {
                            state.row_text.get_or_insert_with(String::new);
                        }
                    }
                    _ => {}
                }
                if in_pic && name == b"blip" {
                    record_embed(&reader, e, anchor.as_mut())?;
                }
            }
            Event::Empty(ref e) => {
                let qname = e.name();
                let name = local_name(qname.as_ref());
                if reader.depth() == 2 && name == b"pic" {
                    if let Some(state) = anchor.as_mut() {
                        state.has_pic = true;
                    }
                }
                if in_pic && name == b"blip" {
                    record_embed(&reader, e, anchor.as_mut())?;
                }
            }
            Event::Text(ref t) if in_row => {
                let text = reader.text(t)?;
                if let Some(row) = anchor.as_mut().and_then(|s| s.row_text.as_mut()) {
                    row.push_str(&text);
                }
            }
            Event::End(_) => match reader.depth() + 1 {
                4 => in_row = false,
                3 => {
                    in_from = false;
                    in_pic = false;
                }
                2 => {
                    if let Some(state) = anchor.take() {
                        finish_anchor(&reader, state, rels, &mut map)?;
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(map)
}

fn record_embed(
    reader: &PartReader<'_>,
    blip: &BytesStart<'_>,
    anchor: Option<&mut AnchorState>,
) -> Result<()> {
    if let Some(state) = anchor {
        if state.embed.is_none() {
            state.embed = reader.prefixed_attr(blip, b"embed")?;
        }
    }
    Ok(())
}

fn finish_anchor(
    reader: &PartReader<'_>,
    state: AnchorState,
    rels: &Relationships,
    map: &mut AnchorMap,
) -> Result<()> {
    let Some(row_text) = state.row_text else {
        return Ok(());
    };
    if !state.has_pic {
        return Ok(());
    }
    let anchor_row: u32 = row_text
        .trim()
        .parse()
        .map_err(|_| reader.error(format!("invalid anchor row '{}'", row_text)))?;

    let Some(embed) = state.embed else {
        log::debug!("Picture at anchor row {} has no embedded image", anchor_row);
        return Ok(());
    };
    let Some(image) = rels.resolve(&embed) else {
        log::warn!(
            "Picture at anchor row {} references unknown relationship {}",
            anchor_row,
            embed
        );
        return Ok(());
    };

    map.insert_anchor(anchor_row, image)
        .ok_or_else(|| reader.error(format!("anchor row {} out of range", anchor_row)))?;
    Ok(())
}
