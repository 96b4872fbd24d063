//! Package relationship (`.rels`) parsing.
//!
//! The same parser serves every level of the package: the root, the
//! workbook, each worksheet and each drawing own a relationship part. Targets
//! are resolved against the directory of the owning part.

use crate::package::Package;
use crate::path::{part_dir, rels_path_for, resolve_target};
use crate::xml::{local_name, PartReader};
use ballot_core::Result;
use quick_xml::events::Event;
use std::collections::HashMap;
use std::io::{Read, Seek};

/// Relationship type suffixes used by the extractor.
pub mod rel_types {
    pub const OFFICE_DOCUMENT: &str = "/officeDocument";
    pub const SHARED_STRINGS: &str = "/sharedStrings";
    pub const DRAWING: &str = "/drawing";
}

/// A single `<Relationship>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    pub external: bool,
}

/// The relationships declared by one part, with its directory for resolving
/// targets.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    base_dir: String,
    entries: Vec<Relationship>,
    by_id: HashMap<String, usize>,
}

impl Relationships {
    /// No relationships; every lookup resolves to nothing.
    pub fn empty(owner: &str) -> Self {
        Self {
            base_dir: part_dir(owner).to_string(),
            ..Default::default()
        }
    }

    /// Parse the relationship document `xml` belonging to the part `owner`.
    pub fn parse(xml: &str, owner: &str) -> Result<Self> {
        let rels_part = rels_path_for(owner);
        let mut reader = PartReader::new(xml, &rels_part);
        let mut rels = Self::empty(owner);

        loop {
            match reader.read_event()? {
                Event::Start(ref e) | Event::Empty(ref e)
                    if local_name(e.name().as_ref()) == b"Relationship" =>
                {
                    let id = reader.attr(e, b"Id")?;
                    let target = reader.attr(e, b"Target")?;
                    let (Some(id), Some(target)) = (id, target) else {
                        log::warn!("{}: relationship without Id or Target skipped", rels_part);
                        continue;
                    };
                    let rel_type = reader.attr(e, b"Type")?.unwrap_or_default();
                    let external = reader
                        .attr(e, b"TargetMode")?
                        .is_some_and(|mode| mode == "External");
                    rels.push(Relationship {
                        id,
                        rel_type,
                        target,
                        external,
                    });
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(rels)
    }

    /// Load the relationships of `owner` from the package.
    ///
    /// A part without a relationship file simply has no relationships.
    pub fn load<R: Read + Seek>(package: &mut Package<R>, owner: &str) -> Result<Self> {
        let rels_part = rels_path_for(owner);
        match package.try_read_xml(&rels_part)? {
            Some(xml) => Self::parse(&xml, owner),
            None => {
                log::debug!("No relationship part {} for {}", rels_part, owner);
                Ok(Self::empty(owner))
            }
        }
    }

    fn push(&mut self, rel: Relationship) {
        // Duplicate ids are invalid OPC; the first declaration is kept.
        if !self.by_id.contains_key(&rel.id) {
            self.by_id.insert(rel.id.clone(), self.entries.len());
        }
        self.entries.push(rel);
    }

    /// The relationship with the given id.
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.by_id.get(id).map(|&idx| &self.entries[idx])
    }

    /// Package path of the part the relationship `id` points to.
    ///
    /// External targets never resolve.
    pub fn resolve(&self, id: &str) -> Option<String> {
        self.get(id).and_then(|rel| self.resolve_rel(rel))
    }

    /// Package path of the first relationship whose type ends with `suffix`.
    pub fn resolve_type(&self, suffix: &str) -> Option<String> {
        self.entries
            .iter()
            .filter(|rel| rel.rel_type.ends_with(suffix))
            .find_map(|rel| self.resolve_rel(rel))
    }

    fn resolve_rel(&self, rel: &Relationship) -> Option<String> {
        if rel.external {
            return None;
        }
        Some(resolve_target(&self.base_dir, &rel.target))
    }

    /// Number of declared relationships.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no relationships are declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
