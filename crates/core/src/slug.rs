//! Slug generation for position titles and headshot file names.

use regex::Regex;
use std::sync::LazyLock;

/// Runs of anything that is not a lowercase ASCII letter or digit.
static NON_SLUG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Turn arbitrary text into a URL- and filename-safe slug.
///
/// Lowercases the text, collapses every run of non-alphanumeric characters
/// into a single `-`, and strips leading and trailing separators. Text with
/// no ASCII letters or digits slugifies to an empty string.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    NON_SLUG_REGEX
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}
