//! Access to the parts of an XLSX zip package.

use ballot_core::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use zip::result::ZipError;
use zip::ZipArchive;

/// An open XLSX package.
///
/// The archive stays open for as long as the value lives; parts are read on
/// demand and nothing else is buffered.
pub struct Package<R: Read + Seek> {
    archive: ZipArchive<R>,
}

impl Package<BufReader<File>> {
    /// Open the package at `path`.
    ///
    /// Fails with [`Error::InputNotFound`] before touching the archive when the
    /// file does not exist.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::InputNotFound(path.to_path_buf()));
        }
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

impl<R: Read + Seek> Package<R> {
    /// Wrap any seekable reader holding a zip archive.
    pub fn from_reader(reader: R) -> Result<Self> {
        let archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;
        Ok(Self { archive })
    }

    /// Read a part's bytes, or `None` when the package has no such part.
    pub fn try_read(&mut self, part: &str) -> Result<Option<Vec<u8>>> {
        let mut file = match self.archive.by_name(part) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => {
                return Err(Error::ZipError(format!(
                    "Failed to open '{}' in archive: {}",
                    part, e
                )))
            }
        };

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", part, e)))?;
        Ok(Some(bytes))
    }

    /// Read a part's bytes; a missing part is an error.
    pub fn read(&mut self, part: &str) -> Result<Vec<u8>> {
        self.try_read(part)?
            .ok_or_else(|| Error::MissingPart(part.to_string()))
    }

    /// Read a part as UTF-8 text, or `None` when the package has no such part.
    pub fn try_read_xml(&mut self, part: &str) -> Result<Option<String>> {
        match self.try_read(part)? {
            Some(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|e| Error::XmlError(format!("'{}' is not valid UTF-8: {}", part, e))),
            None => Ok(None),
        }
    }

    /// Read a part as UTF-8 text; a missing part is an error.
    pub fn read_xml(&mut self, part: &str) -> Result<String> {
        self.try_read_xml(part)?
            .ok_or_else(|| Error::MissingPart(part.to_string()))
    }
}
