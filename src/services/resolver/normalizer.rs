//! Text normalization for catalog name matching.
//! Parenthetical stripping, literal patterns, and similarity/heritage folding.

use deunicode::deunicode;
use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

/// Compiled regex for a trailing parenthetical suffix: `"Foo (Bar)"` → `"Foo"`.
static RE_TRAILING_PAREN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\([^()]*\)\s*$").expect("Invalid regex"));

/// Compiled regex for runs of whitespace.
static RE_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid regex"));

/// Minimum length (in chars) for a word to count as significant.
const SIGNIFICANT_WORD_MIN: usize = 4;

/// Remove one trailing parenthetical suffix and trim.
pub fn strip_trailing_parenthetical(name: &str) -> String {
    RE_TRAILING_PAREN.replace(name, "").trim().to_string()
}

/// Case-insensitive regex matching `text` literally anywhere in a name.
///
/// Returns `None` for blank input, which would otherwise match everything.
pub fn literal_pattern(text: &str) -> Option<Regex> {
    if text.trim().is_empty() {
        return None;
    }
    build_case_insensitive(&regex::escape(text))
}

/// Case-insensitive regex for two adjacent words separated by whitespace.
pub fn word_pair_pattern(first: &str, second: &str) -> Option<Regex> {
    build_case_insensitive(&format!(
        r"{}\s+{}",
        regex::escape(first),
        regex::escape(second)
    ))
}

/// Case-insensitive regex anchored at the start of a name.
pub fn prefix_pattern(word: &str) -> Option<Regex> {
    if word.is_empty() {
        return None;
    }
    build_case_insensitive(&format!("^{}", regex::escape(word)))
}

fn build_case_insensitive(pattern: &str) -> Option<Regex> {
    match RegexBuilder::new(pattern).case_insensitive(true).build() {
        Ok(re) => Some(re),
        Err(e) => {
            log::warn!("Could not build name pattern '{}': {}", pattern, e);
            None
        }
    }
}

/// Words longer than three characters, in order.
pub fn significant_words(name: &str) -> Vec<&str> {
    name.split_whitespace()
        .filter(|word| word.chars().count() >= SIGNIFICANT_WORD_MIN)
        .collect()
}

/// Normalize text for similarity scoring.
///
/// Pipeline:
/// 1. Unify typographic quotes to ASCII `'` and `"`
/// 2. Collapse whitespace runs to a single space and trim
/// 3. Lowercase
pub fn normalize_for_similarity(text: &str) -> String {
    let unified: String = text
        .chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' | '\u{201B}' | '\u{2032}' | '`' | '\u{00B4}' => '\'',
            '\u{201C}' | '\u{201D}' | '\u{201F}' | '\u{2033}' => '"',
            other => other,
        })
        .collect();

    RE_WHITESPACE
        .replace_all(unified.trim(), " ")
        .to_lowercase()
}

/// Normalize a heritage (racial trait) name: trim and transliterate to Latin
/// so that accented or typographic variants compare equal.
pub fn normalize_heritage_name(text: &str) -> String {
    deunicode(text.trim()).trim().to_string()
}

#[cfg(test)]
#[path = "tests/normalizer_tests.rs"]
mod tests;
