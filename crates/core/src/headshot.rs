//! Naming and storage of extracted headshot images.

use crate::{slugify, Result};
use std::path::{Path, PathBuf};

/// Extension used when the source image part has none.
const DEFAULT_EXTENSION: &str = ".jpg";

/// Build the output file name for a candidate's headshot.
///
/// The name is `<position slug>-<candidate slug><ext>`. When the candidate
/// name has no sluggable characters, `row-<row>` stands in for it. The
/// extension comes from the image's path inside the package.
pub fn headshot_file_name(position_slug: &str, candidate: &str, row: u32, image_part: &str) -> String {
    let candidate_slug = match slugify(candidate) {
        slug if slug.is_empty() => format!("row-{}", row),
        slug => slug,
    };
    format!(
        "{}-{}{}",
        position_slug,
        candidate_slug,
        image_extension(image_part)
    )
}

/// The extension (with leading dot) of the last path segment, or `.jpg`.
fn image_extension(image_part: &str) -> &str {
    let file_name = image_part.rsplit('/').next().unwrap_or(image_part);
    match file_name.rfind('.') {
        Some(pos) if pos > 0 && pos + 1 < file_name.len() => &file_name[pos..],
        _ => DEFAULT_EXTENSION,
    }
}

/// Destination for extracted headshot bytes.
pub trait HeadshotSink {
    /// Store `bytes` under `file_name` and return the path to record on the
    /// candidate.
    fn store(&mut self, file_name: &str, bytes: &[u8]) -> Result<String>;
}

/// Writes headshots into a directory, overwriting existing files.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    /// Directory the images are written to.
    dir: PathBuf,

    /// Recorded paths are made relative to this directory when set.
    relative_to: Option<PathBuf>,
}

impl DirectorySink {
    /// Create a sink writing into `dir`. The directory is created on first use.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            relative_to: None,
        }
    }

    /// Record paths relative to `base` instead of as written.
    pub fn with_relative_to(mut self, base: impl Into<PathBuf>) -> Self {
        self.relative_to = Some(base.into());
        self
    }

    fn recorded_path(&self, path: &Path) -> String {
        let shown = self
            .relative_to
            .as_deref()
            .and_then(|base| path.strip_prefix(base).ok())
            .unwrap_or(path);
        shown.to_string_lossy().replace('\\', "/")
    }
}

impl HeadshotSink for DirectorySink {
    fn store(&mut self, file_name: &str, bytes: &[u8]) -> Result<String> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        std::fs::write(&path, bytes)?;
        log::debug!("Wrote headshot {} ({} bytes)", path.display(), bytes.len());
        Ok(self.recorded_path(&path))
    }
}
