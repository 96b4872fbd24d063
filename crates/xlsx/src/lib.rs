//! XLSX (Office Open XML) extraction engine for election candidate sheets.
//!
//! Walks the package relationship graph (workbook → worksheet → drawing →
//! image), reads worksheet rows through the shared string table and joins
//! them with the pictures anchored to each row.

pub mod drawing;
pub mod extractor;
pub mod package;
pub mod path;
pub mod rels;
pub mod rows;
pub mod shared_strings;
pub mod workbook;
mod xml;

#[cfg(test)]
mod fixtures;

pub use drawing::AnchorMap;
pub use extractor::{ExtractOptions, Extractor};
pub use package::Package;
pub use rels::Relationships;
pub use rows::RawRow;
pub use shared_strings::SharedStrings;
pub use workbook::SheetTarget;
