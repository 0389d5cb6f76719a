use super::*;

#[test]
fn test_edit_distance_classic() {
    assert_eq!(edit_distance("kitten", "sitting"), 3);
    assert_eq!(edit_distance("", "abc"), 3);
    assert_eq!(edit_distance("same", "same"), 0);
}

#[test]
fn test_similarity_bounds() {
    assert_eq!(similarity("", ""), 0.0);
    assert_eq!(similarity("abc", "abc"), 1.0);
    assert_eq!(similarity("abc", ""), 0.0);
}

#[test]
fn test_apostrophe_drop_scores_high_but_not_exact() {
    let score = normalized_similarity("Irontooth's Bite", "Irontooths Bite");
    assert!(score >= 0.70, "score was {score}");
    assert!(score < 1.0, "score was {score}");
    assert!((score - 15.0 / 16.0).abs() < 1e-9);
}

#[test]
fn test_normalized_similarity_ignores_case_and_spacing() {
    assert_eq!(normalized_similarity("Magic  Missile", "magic missile"), 1.0);
}

#[test]
fn test_similarity_counts_chars_not_bytes() {
    // One substitution over four chars, even though the accented char is two bytes.
    assert_eq!(similarity("caf\u{00E9}", "cafe"), 0.75);
}
