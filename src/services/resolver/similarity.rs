//! Edit-distance similarity, the last-resort matching signal.

use crate::services::resolver::normalizer::normalize_for_similarity;

/// Single-character insert/delete/substitute distance, counted in chars.
pub fn edit_distance(a: &str, b: &str) -> usize {
    strsim::levenshtein(a, b)
}

/// `(maxLen - distance) / maxLen` over the two strings as given.
/// Two empty strings score 0.
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 0.0;
    }
    let distance = edit_distance(a, b);
    (max_len - distance) as f64 / max_len as f64
}

/// Similarity after normalizing both sides (whitespace, quotes, case).
pub fn normalized_similarity(a: &str, b: &str) -> f64 {
    similarity(&normalize_for_similarity(a), &normalize_for_similarity(b))
}

#[cfg(test)]
#[path = "tests/similarity_tests.rs"]
mod tests;
