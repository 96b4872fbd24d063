//! JSON output for extracted ballots.

use crate::{Ballot, Result};
use std::path::Path;

/// Render a ballot as pretty-printed JSON with a trailing newline.
///
/// Keys keep the field order of the domain types, so two runs over the same
/// workbook produce identical output.
pub fn to_json(ballot: &Ballot) -> Result<String> {
    let mut json = serde_json::to_string_pretty(ballot)?;
    json.push('\n');
    Ok(json)
}

/// Write a ballot as JSON to `path`, creating parent directories as needed.
pub fn write_json(path: &Path, ballot: &Ballot) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, to_json(ballot)?)?;
    log::info!(
        "Wrote {} positions ({} candidates) to {}",
        ballot.positions.len(),
        ballot.candidate_count(),
        path.display()
    );
    Ok(())
}
