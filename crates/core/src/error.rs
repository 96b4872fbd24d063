//! Error types for election candidate extraction.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while extracting candidates from a spreadsheet.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read or write a file.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The input spreadsheet does not exist.
    #[error("Missing spreadsheet at {}", .0.display())]
    InputNotFound(PathBuf),

    /// ZIP archive error.
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing error in one of the package parts.
    #[error("XML parsing error: {0}")]
    XmlError(String),

    /// A part referenced by a resolved relationship is not in the package.
    #[error("Part not found in package: {0}")]
    MissingPart(String),

    /// A shared-string cell holds something other than a numeric index.
    #[error("Invalid shared string index '{value}' in cell {cell}")]
    InvalidSharedStringIndex { cell: String, value: String },

    /// A shared-string cell points past the end of the shared string table.
    #[error("Shared string index {index} out of range in cell {cell} (table has {len} entries)")]
    SharedStringOutOfRange {
        cell: String,
        index: usize,
        len: usize,
    },

    /// Serializing or deserializing JSON failed.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A configuration value could not be understood.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
