//! Workbook part: locating it and listing its sheets.

use crate::package::Package;
use crate::rels::{rel_types, Relationships};
use crate::xml::{local_name, PartReader};
use ballot_core::Result;
use quick_xml::events::Event;
use std::io::{Read, Seek};

/// Conventional location of the workbook part.
const DEFAULT_WORKBOOK_PART: &str = "xl/workbook.xml";

/// A worksheet declared by the workbook and the part that holds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetTarget {
    /// Sheet name as declared in the workbook.
    pub name: String,

    /// Package path of the worksheet part.
    pub path: String,
}

/// Package path of the workbook part, from the root relationships.
pub fn workbook_part<R: Read + Seek>(package: &mut Package<R>) -> Result<String> {
    let root_rels = Relationships::load(package, "")?;
    Ok(root_rels
        .resolve_type(rel_types::OFFICE_DOCUMENT)
        .unwrap_or_else(|| DEFAULT_WORKBOOK_PART.to_string()))
}

/// A `<sheet>` entry before its relationship is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DeclaredSheet {
    name: Option<String>,
    rel_id: Option<String>,
}

/// Parse the ordered `<sheets>` list of a workbook document.
fn parse_declared_sheets(xml: &str, part: &str) -> Result<Vec<DeclaredSheet>> {
    let mut reader = PartReader::new(xml, part);
    let mut sheets = Vec::new();
    let mut in_sheets = false;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) if local_name(e.name().as_ref()) == b"sheets" => in_sheets = true,
            Event::End(ref e) if local_name(e.name().as_ref()) == b"sheets" => in_sheets = false,
            Event::Start(ref e) | Event::Empty(ref e)
                if in_sheets && local_name(e.name().as_ref()) == b"sheet" =>
            {
                sheets.push(DeclaredSheet {
                    name: reader.attr(e, b"name")?,
                    rel_id: reader.prefixed_attr(e, b"id")?,
                });
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(sheets)
}

/// Resolve every declared sheet to its worksheet part, in declared order.
///
/// Sheets whose relationship id does not resolve are skipped.
pub fn resolve_sheet_targets(
    declared_xml: &str,
    workbook_part: &str,
    workbook_rels: &Relationships,
) -> Result<Vec<SheetTarget>> {
    let declared = parse_declared_sheets(declared_xml, workbook_part)?;
    let mut targets = Vec::with_capacity(declared.len());

    for sheet in declared {
        let path = sheet
            .rel_id
            .as_deref()
            .and_then(|id| workbook_rels.resolve(id));
        let Some(path) = path else {
            log::warn!(
                "Skipping sheet {:?}: relationship {:?} does not resolve",
                sheet.name,
                sheet.rel_id
            );
            continue;
        };
        let name = sheet.name.unwrap_or_else(|| path.clone());
        targets.push(SheetTarget { name, path });
    }

    Ok(targets)
}

/// Load the workbook's sheet list from the package.
///
/// Returns the sheet targets together with the workbook relationships, which
/// also locate the shared string table.
pub fn load_sheet_targets<R: Read + Seek>(
    package: &mut Package<R>,
) -> Result<(Vec<SheetTarget>, Relationships)> {
    let part = workbook_part(package)?;
    let xml = package.read_xml(&part)?;
    let rels = Relationships::load(package, &part)?;
    let targets = resolve_sheet_targets(&xml, &part, &rels)?;
    log::debug!("Workbook {} declares {} resolvable sheets", part, targets.len());
    Ok((targets, rels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{rels_xml, zip_parts, REL_OFFICE_DOCUMENT, REL_WORKSHEET};
    use ballot_core::Error;
    use std::io::Cursor;

    const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <bookViews><workbookView/></bookViews>
  <sheets>
    <sheet name="Pres" sheetId="1" r:id="rId3"/>
    <sheet name="Orphan" sheetId="2" r:id="rId99"/>
    <sheet name="Q&amp;A" sheetId="5" r:id="rId1"/>
  </sheets>
  <definedNames><definedName name="x">Pres!$A$1</definedName></definedNames>
</workbook>"#;

    fn workbook_rels() -> Relationships {
        let xml = rels_xml(&[
            ("rId1", REL_WORKSHEET, "worksheets/sheet2.xml"),
            ("rId3", REL_WORKSHEET, "worksheets/sheet1.xml"),
        ]);
        Relationships::parse(&xml, "xl/workbook.xml").unwrap()
    }

    #[test]
    fn test_declared_order_and_skipping() {
        let targets = resolve_sheet_targets(WORKBOOK, "xl/workbook.xml", &workbook_rels()).unwrap();
        assert_eq!(
            targets,
            vec![
                SheetTarget {
                    name: "Pres".to_string(),
                    path: "xl/worksheets/sheet1.xml".to_string(),
                },
                SheetTarget {
                    name: "Q&A".to_string(),
                    path: "xl/worksheets/sheet2.xml".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_sheet_without_name_uses_path() {
        let xml = r#"<workbook xmlns:r="urn:r"><sheets><sheet r:id="rId1"/></sheets></workbook>"#;
        let targets = resolve_sheet_targets(xml, "xl/workbook.xml", &workbook_rels()).unwrap();
        assert_eq!(targets[0].name, "xl/worksheets/sheet2.xml");
    }

    #[test]
    fn test_malformed_workbook() {
        let result = resolve_sheet_targets("<workbook><sheets>", "xl/workbook.xml", &workbook_rels());
        assert!(matches!(result, Err(Error::XmlError(_))));
    }

    #[test]
    fn test_workbook_part_from_root_rels() {
        let root = rels_xml(&[("rId1", REL_OFFICE_DOCUMENT, "/custom/book.xml")]);
        let bytes = zip_parts(&[("_rels/.rels", root.as_bytes())]);
        let mut package = Package::from_reader(Cursor::new(bytes)).unwrap();
        assert_eq!(workbook_part(&mut package).unwrap(), "custom/book.xml");
    }

    #[test]
    fn test_workbook_part_fallback() {
        let bytes = zip_parts(&[("xl/workbook.xml", WORKBOOK.as_bytes())]);
        let mut package = Package::from_reader(Cursor::new(bytes)).unwrap();
        assert_eq!(workbook_part(&mut package).unwrap(), "xl/workbook.xml");
    }

    #[test]
    fn test_load_sheet_targets() {
        let rels = rels_xml(&[("rId3", REL_WORKSHEET, "worksheets/sheet1.xml")]);
        let bytes = zip_parts(&[
            ("xl/workbook.xml", WORKBOOK.as_bytes()),
            ("xl/_rels/workbook.xml.rels", rels.as_bytes()),
        ]);
        let mut package = Package::from_reader(Cursor::new(bytes)).unwrap();

        let (targets, rels) = load_sheet_targets(&mut package).unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].name, "Pres");
        assert_eq!(rels.len(), 1);
    }

    #[test]
    fn test_load_without_workbook_part() {
        let bytes = zip_parts(&[("docProps/app.xml", b"<Properties/>".as_slice())]);
        let mut package = Package::from_reader(Cursor::new(bytes)).unwrap();
        assert!(matches!(
            load_sheet_targets(&mut package),
            Err(Error::MissingPart(part)) if part == "xl/workbook.xml"
        ));
    }
}
