//! In-memory XLSX packages for tests.

use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

pub const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
pub const REL_WORKSHEET: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
pub const REL_SHARED_STRINGS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings";
pub const REL_DRAWING: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/drawing";
pub const REL_IMAGE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

/// Zip the given parts, in order.
pub fn zip_parts(parts: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, bytes) in parts {
        zip.start_file(*name, FileOptions::default()).unwrap();
        zip.write_all(bytes).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

/// A `.rels` document from `(id, type, target)` triples.
pub fn rels_xml(rels: &[(&str, &str, &str)]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for (id, rel_type, target) in rels {
        xml.push_str(&format!(
            r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
            id, rel_type, target
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

/// A shared string table with one plain `<si><t>` per entry.
pub fn shared_strings_xml(strings: &[String]) -> String {
    let mut xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{0}" uniqueCount="{0}">"#,
        strings.len()
    );
    for s in strings {
        xml.push_str(&format!(r#"<si><t xml:space="preserve">{}</t></si>"#, escape(s)));
    }
    xml.push_str("</sst>");
    xml
}

/// Wrap raw `<row>` markup in a worksheet document.
pub fn sheet_xml(rows: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><dimension ref="A1:C3"/><sheetData>{}</sheetData><drawing r:id="rId1"/></worksheet>"#,
        rows
    )
}

/// Wrap raw anchor markup in a spreadsheet drawing document.
pub fn drawing_xml(anchors: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<xdr:wsDr xmlns:xdr="http://schemas.openxmlformats.org/drawingml/2006/spreadsheetDrawing" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">{}</xdr:wsDr>"#,
        anchors
    )
}

/// A two-cell anchor holding a picture at the given zero-based row.
pub fn picture_anchor(zero_based_row: u32, embed: &str) -> String {
    format!(
        r#"<xdr:twoCellAnchor editAs="oneCell"><xdr:from><xdr:col>1</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>{row}</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:from><xdr:to><xdr:col>2</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>{next}</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:to><xdr:pic><xdr:nvPicPr><xdr:cNvPr id="{id}" name="Picture {id}"/><xdr:cNvPicPr><a:picLocks noChangeAspect="1"/></xdr:cNvPicPr></xdr:nvPicPr><xdr:blipFill><a:blip r:embed="{embed}"/><a:stretch><a:fillRect/></a:stretch></xdr:blipFill><xdr:spPr><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></xdr:spPr></xdr:pic><xdr:clientData/></xdr:twoCellAnchor>"#,
        row = zero_based_row,
        next = zero_based_row.saturating_add(1),
        id = zero_based_row.saturating_add(2),
        embed = embed
    )
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// One worksheet of a [`WorkbookFixture`].
#[derive(Default)]
pub struct SheetFixture {
    name: String,
    rows: Vec<(u32, Vec<(String, String)>)>,
    images: Vec<(u32, String, Vec<u8>)>,
}

impl SheetFixture {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Add a row of shared-string cells. Empty values are left out entirely.
    pub fn row(mut self, row: u32, cells: &[(&str, &str)]) -> Self {
        let cells = cells
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(col, value)| (col.to_string(), value.to_string()))
            .collect();
        self.rows.push((row, cells));
        self
    }

    /// Anchor an image at a zero-based drawing row.
    pub fn image(mut self, zero_based_row: u32, file_name: &str, bytes: &[u8]) -> Self {
        self.images
            .push((zero_based_row, file_name.to_string(), bytes.to_vec()));
        self
    }
}

/// Builds a complete, minimal workbook package.
#[derive(Default)]
pub struct WorkbookFixture {
    sheets: Vec<SheetFixture>,
}

impl WorkbookFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheet(mut self, sheet: SheetFixture) -> Self {
        self.sheets.push(sheet);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut strings: Vec<String> = Vec::new();
        let mut parts: Vec<(String, Vec<u8>)> = Vec::new();

        let mut sheet_entries = String::new();
        let mut workbook_rels: Vec<(String, String, String)> = Vec::new();

        for (idx, sheet) in self.sheets.iter().enumerate() {
            let n = idx + 1;
            let rel_id = format!("rId{}", n);
            sheet_entries.push_str(&format!(
                r#"<sheet name="{}" sheetId="{}" r:id="{}"/>"#,
                escape(&sheet.name),
                n,
                rel_id
            ));
            workbook_rels.push((
                rel_id,
                REL_WORKSHEET.to_string(),
                format!("worksheets/sheet{}.xml", n),
            ));

            let mut rows = String::new();
            for (row, cells) in &sheet.rows {
                rows.push_str(&format!(r#"<row r="{}">"#, row));
                for (col, value) in cells {
                    let index = match strings.iter().position(|s| s == value) {
                        Some(index) => index,
                        None => {
                            strings.push(value.clone());
                            strings.len() - 1
                        }
                    };
                    rows.push_str(&format!(
                        r#"<c r="{}{}" t="s"><v>{}</v></c>"#,
                        col, row, index
                    ));
                }
                rows.push_str("</row>");
            }
            parts.push((
                format!("xl/worksheets/sheet{}.xml", n),
                sheet_xml(&rows).into_bytes(),
            ));

            if sheet.images.is_empty() {
                continue;
            }

            let drawing_target = format!("../drawings/drawing{}.xml", n);
            parts.push((
                format!("xl/worksheets/_rels/sheet{}.xml.rels", n),
                rels_xml(&[("rId1", REL_DRAWING, drawing_target.as_str())]).into_bytes(),
            ));

            let mut anchors = String::new();
            let mut drawing_rels: Vec<(String, String)> = Vec::new();
            for (image_idx, (row, file_name, bytes)) in sheet.images.iter().enumerate() {
                let embed = format!("rId{}", image_idx + 1);
                anchors.push_str(&picture_anchor(*row, &embed));
                drawing_rels.push((embed, format!("../media/{}", file_name)));
                parts.push((format!("xl/media/{}", file_name), bytes.clone()));
            }
            let drawing_rels: Vec<(&str, &str, &str)> = drawing_rels
                .iter()
                .map(|(id, target)| (id.as_str(), REL_IMAGE, target.as_str()))
                .collect();
            parts.push((
                format!("xl/drawings/drawing{}.xml", n),
                drawing_xml(&anchors).into_bytes(),
            ));
            parts.push((
                format!("xl/drawings/_rels/drawing{}.xml.rels", n),
                rels_xml(&drawing_rels).into_bytes(),
            ));
        }

        if !strings.is_empty() {
            workbook_rels.push((
                format!("rId{}", self.sheets.len() + 1),
                REL_SHARED_STRINGS.to_string(),
                "sharedStrings.xml".to_string(),
            ));
            parts.push((
                "xl/sharedStrings.xml".to_string(),
                shared_strings_xml(&strings).into_bytes(),
            ));
        }

        let workbook = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>{}</sheets></workbook>"#,
            sheet_entries
        );
        let workbook_rels: Vec<(&str, &str, &str)> = workbook_rels
            .iter()
            .map(|(id, t, target)| (id.as_str(), t.as_str(), target.as_str()))
            .collect();

        let root_rels = rels_xml(&[("rId1", REL_OFFICE_DOCUMENT, "xl/workbook.xml")]);
        let workbook_rels = rels_xml(&workbook_rels);
        let mut all: Vec<(&str, &[u8])> = vec![
            ("_rels/.rels", root_rels.as_bytes()),
            ("xl/workbook.xml", workbook.as_bytes()),
            ("xl/_rels/workbook.xml.rels", workbook_rels.as_bytes()),
        ];
        all.extend(parts.iter().map(|(name, bytes)| (name.as_str(), bytes.as_slice())));
        zip_parts(&all)
    }
}
