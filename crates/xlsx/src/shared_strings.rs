//! Shared string table (`xl/sharedStrings.xml`).

use crate::package::Package;
use crate::rels::{rel_types, Relationships};
use crate::xml::{local_name, PartReader};
use ballot_core::Result;
use quick_xml::events::Event;
use std::io::{Read, Seek};

/// Conventional location of the shared string part.
const DEFAULT_PART: &str = "xl/sharedStrings.xml";

/// The workbook's interned strings, indexed by position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedStrings {
    strings: Vec<String>,
}

impl SharedStrings {
    /// Load the table named by the workbook relationships, falling back to
    /// the conventional part. A workbook without one has an empty table.
    pub fn load<R: Read + Seek>(
        package: &mut Package<R>,
        workbook_rels: &Relationships,
    ) -> Result<Self> {
        let part = workbook_rels
            .resolve_type(rel_types::SHARED_STRINGS)
            .unwrap_or_else(|| DEFAULT_PART.to_string());

        match package.try_read_xml(&part)? {
            Some(xml) => {
                let table = Self::parse(&xml, &part)?;
                log::debug!("Loaded {} shared strings from {}", table.len(), part);
                Ok(table)
            }
            None => {
                log::debug!("No shared string table at {}", part);
                Ok(Self::default())
            }
        }
    }

    /// Parse a shared string document.
    ///
    /// Each `<si>` becomes the concatenation of its text runs in document
    /// order. Phonetic guides (`<rPh>`) are not part of the text.
    pub fn parse(xml: &str, part: &str) -> Result<Self> {
        let mut reader = PartReader::new(xml, part);
        let mut strings = Vec::new();

        let mut current: Option<String> = None;
        let mut in_phonetic = false;
        let mut in_text = false;

        loop {
            match reader.read_event()? {
                Event::Start(ref e) => match local_name(e.name().as_ref()) {
                    b"si" => current = Some(String::new()),
                    b"rPh" => in_phonetic = true,
                    b"t" if current.is_some() && !in_phonetic => in_text = true,
                    _ => {}
                },
                Event::Empty(ref e) if local_name(e.name().as_ref()) == b"si" => {
                    strings.push(String::new());
                }
                Event::Text(ref t) if in_text => {
                    if let Some(s) = current.as_mut() {
                        s.push_str(&reader.text(t)?);
                    }
                }
                Event::CData(ref c) if in_text => {
                    if let Some(s) = current.as_mut() {
                        s.push_str(&String::from_utf8_lossy(c));
                    }
                }
                Event::End(ref e) => match local_name(e.name().as_ref()) {
                    b"si" => {
                        if let Some(s) = current.take() {
                            strings.push(s);
                        }
                    }
                    b"rPh" => in_phonetic = false,
                    b"t" => in_text = false,
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(Self { strings })
    }

    /// The string at `index`.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.strings.get(index).map(String::as_str)
    }

    /// Number of strings.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl From<Vec<String>> for SharedStrings {
    fn from(strings: Vec<String>) -> Self {
        Self { strings }
    }
}
