//! Part name helpers for paths inside the package.
//!
//! Part names use `/` separators and never start with `/`.

/// Directory portion of a part name (`xl/worksheets/sheet1.xml` → `xl/worksheets`).
pub fn part_dir(part: &str) -> &str {
    part.rfind('/').map(|pos| &part[..pos]).unwrap_or("")
}

/// File name portion of a part name.
pub fn part_file_name(part: &str) -> &str {
    part.rfind('/').map(|pos| &part[pos + 1..]).unwrap_or(part)
}

/// Relationship part for `part`: `<dir>/_rels/<file>.rels`.
pub fn rels_path_for(part: &str) -> String {
    let dir = part_dir(part);
    let file = part_file_name(part);
    if dir.is_empty() {
        format!("_rels/{}.rels", file)
    } else {
        format!("{}/_rels/{}.rels", dir, file)
    }
}

/// Resolve a relationship target against the directory of its owning part.
///
/// Targets starting with `/` are package-absolute. `.` segments are dropped
/// and `..` segments pop a directory; popping past the root is ignored.
pub fn resolve_target(base_dir: &str, target: &str) -> String {
    let joined = match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None if base_dir.is_empty() => target.to_string(),
        None => format!("{}/{}", base_dir, target),
    };
    normalize(&joined)
}

/// Collapse `.`, `..` and empty segments in a part name.
pub fn normalize(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            _ => parts.push(segment),
        }
    }
    parts.join("/")
}
