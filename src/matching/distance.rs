use rapidfuzz::distance::levenshtein;

use crate::matching::normalize_imprint;

/// Similarity returned when one imprint contains the other
pub const DEFAULT_SUBSTRING_SIMILARITY: f64 = 0.9;

/// Unit-cost edit distance (insert/delete/substitute) over characters
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    levenshtein::distance(a.chars(), b.chars())
}

/// Imprint similarity in [0, 1] with the default substring score
pub fn fuzzy_imprint_score(search: &str, target: &str) -> f64 {
    fuzzy_imprint_score_with(search, target, DEFAULT_SUBSTRING_SIMILARITY)
}

/// Imprint similarity in [0, 1].
///
/// Both sides are normalized first. Equal → 1.0, either empty → 0.0, one
/// containing the other → `substring_similarity`, else edit distance as a
/// fraction of the longer imprint.
pub fn fuzzy_imprint_score_with(search: &str, target: &str, substring_similarity: f64) -> f64 {
    let s = normalize_imprint(search);
    let t = normalize_imprint(target);

    if s == t {
        return 1.0;
    }
    if s.is_empty() || t.is_empty() {
        return 0.0;
    }
    if t.contains(&s) || s.contains(&t) {
        return substring_similarity;
    }

    let max_len = s.chars().count().max(t.chars().count());
    let dist = levenshtein_distance(&s, &t);

    (1.0 - dist as f64 / max_len as f64).max(0.0)
}
