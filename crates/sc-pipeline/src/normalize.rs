//! Text canonicalization for exact keyword matching.

use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Lowercase `text` and drop every whitespace run.
///
/// Used on both queries and catalog names so "My Recipe Note" and
/// "myrecipenote" compare equal. Idempotent.
pub fn normalize(text: &str) -> String {
    WHITESPACE.replace_all(text, "").to_lowercase()
}
