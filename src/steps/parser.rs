//! Line preprocessing for step text

use once_cell::sync::Lazy;
use regex::Regex;

/// Leading ordinal such as "1.", "12)" or a bare "3 "
static ORDINAL_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+[.)]?\s*").expect("ordinal prefix pattern is valid"));

/// Split step text into cleaned action lines.
///
/// Lines that are empty after trimming are dropped. Every other line is
/// trimmed and loses its ordinal prefix, keeping the original order.
pub fn clean_lines(steps_text: &str) -> Vec<String> {
    steps_text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(strip_ordinal)
        .collect()
}

/// Remove a leading ordinal prefix and surrounding whitespace from one line
pub fn strip_ordinal(line: &str) -> String {
    ORDINAL_PREFIX.replace(line.trim(), "").trim().to_string()
}
