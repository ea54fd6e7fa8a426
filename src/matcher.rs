//! # Similarity Matcher Module
//!
//! Fuzzy keyword matching for free-text guide lookup, based on
//! Jaro–Winkler string similarity. Jaro–Winkler rewards common prefixes
//! and character-order closeness, which suits short guide keys better
//! than plain Levenshtein distance.
//!
//! Matching is deterministic: candidates are scanned in their stored
//! (configuration insertion) order and the best score only moves on a
//! strictly greater value, so equal-scoring candidates resolve to the
//! first one encountered.

use crate::guide_store::GuideEntry;

/// Minimum similarity for a match scoped to one category
pub const DEFAULT_CATEGORY_THRESHOLD: f64 = 0.60;
/// Minimum similarity for the cross-category search. Stricter than the
/// category threshold: a false positive across categories costs more
/// user trust than one inside a category the user already chose.
pub const DEFAULT_GLOBAL_THRESHOLD: f64 = 0.75;

/// Winkler prefix bonus scale
const WINKLER_PREFIX_SCALE: f64 = 0.1;
/// Winkler prefix length cap
const WINKLER_MAX_PREFIX: usize = 4;

/// Similarity thresholds for the two search scopes
#[derive(Debug, Clone)]
pub struct MatcherConfig {
    /// Threshold for searches scoped to one category's guides
    pub category_threshold: f64,
    /// Threshold for searches across the union of all guides
    pub global_threshold: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            category_threshold: DEFAULT_CATEGORY_THRESHOLD,
            global_threshold: DEFAULT_GLOBAL_THRESHOLD,
        }
    }
}

/// Jaro similarity between two strings, in [0, 1].
pub fn jaro(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let a_len = a.len();
    let b_len = b.len();

    if a_len == 0 && b_len == 0 {
        return 1.0;
    }
    if a_len == 0 || b_len == 0 {
        return 0.0;
    }

    // Characters match if equal and within half the longer length of
    // each other
    let window = (a_len.max(b_len) / 2).saturating_sub(1);

    let mut a_matched = vec![false; a_len];
    let mut b_matched = vec![false; b_len];
    let mut matches = 0usize;

    for i in 0..a_len {
        let lo = i.saturating_sub(window);
        let hi = (i + window + 1).min(b_len);
        for j in lo..hi {
            if !b_matched[j] && a[i] == b[j] {
                a_matched[i] = true;
                b_matched[j] = true;
                matches += 1;
                break;
            }
        }
    }

    if matches == 0 {
        return 0.0;
    }

    // Transpositions: matched characters that appear in a different order
    let mut transpositions = 0usize;
    let mut j = 0usize;
    for i in 0..a_len {
        if a_matched[i] {
            while !b_matched[j] {
                j += 1;
            }
            if a[i] != b[j] {
                transpositions += 1;
            }
            j += 1;
        }
    }

    let m = matches as f64;
    let t = (transpositions / 2) as f64;
    (m / a_len as f64 + m / b_len as f64 + (m - t) / m) / 3.0
}

/// Jaro–Winkler similarity: Jaro boosted by a bonus for a shared prefix
/// of up to four characters.
pub fn jaro_winkler(a: &str, b: &str) -> f64 {
    let score = jaro(a, b);
    let prefix = a
        .chars()
        .zip(b.chars())
        .take(WINKLER_MAX_PREFIX)
        .take_while(|(x, y)| x == y)
        .count();
    score + prefix as f64 * WINKLER_PREFIX_SCALE * (1.0 - score)
}

/// Case-insensitive similarity between a user query and a guide key
pub fn similarity(query: &str, key: &str) -> f64 {
    jaro_winkler(&query.to_lowercase(), &key.to_lowercase())
}

/// Find the best-matching guide for a free-text query.
///
/// Candidates scoring below `threshold` are discarded. Among the
/// survivors the strictly highest score wins; ties resolve to the first
/// candidate in iteration order. `None` is the normal "nothing close
/// enough" outcome, not an error.
pub fn find_best_match<'a>(
    query: &str,
    candidates: impl IntoIterator<Item = &'a GuideEntry>,
    threshold: f64,
) -> Option<&'a GuideEntry> {
    let mut best: Option<(&GuideEntry, f64)> = None;
    for entry in candidates {
        let score = similarity(query, &entry.key);
        if score < threshold {
            continue;
        }
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((entry, score)),
        }
    }
    best.map(|(entry, _)| entry)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str) -> GuideEntry {
        GuideEntry {
            key: key.to_string(),
            description: format!("description of {key}"),
            pdf: None,
        }
    }

    #[test]
    fn test_jaro_identical_strings() {
        assert_eq!(jaro("abrir caja", "abrir caja"), 1.0);
        assert_eq!(jaro("", ""), 1.0);
    }

    #[test]
    fn test_jaro_disjoint_strings() {
        assert_eq!(jaro("abc", "xyz"), 0.0);
        assert_eq!(jaro("abc", ""), 0.0);
    }

    #[test]
    fn test_jaro_known_value() {
        // Classic reference pair: MARTHA / MARHTA
        let score = jaro("martha", "marhta");
        assert!((score - 0.9444).abs() < 1e-3, "got {score}");
    }

    #[test]
    fn test_jaro_winkler_prefix_bonus() {
        let score = jaro_winkler("martha", "marhta");
        assert!((score - 0.9611).abs() < 1e-3, "got {score}");
        // The bonus never pushes a perfect score past 1.0
        assert_eq!(jaro_winkler("caja", "caja"), 1.0);
    }

    #[test]
    fn test_similarity_is_case_insensitive() {
        assert_eq!(similarity("Abrir Caja", "abrir caja"), 1.0);
    }

    #[test]
    fn test_find_best_match_exact() {
        let guides = vec![entry("abrir caja"), entry("cerrar caja")];
        let found = find_best_match("abrir caja", guides.iter(), DEFAULT_GLOBAL_THRESHOLD);
        assert_eq!(found.map(|g| g.key.as_str()), Some("abrir caja"));
    }

    #[test]
    fn test_find_best_match_typo() {
        let guides = vec![entry("abrir caja"), entry("registrar venta")];
        let found = find_best_match("abrr caja", guides.iter(), DEFAULT_CATEGORY_THRESHOLD);
        assert_eq!(found.map(|g| g.key.as_str()), Some("abrir caja"));
    }

    #[test]
    fn test_find_best_match_below_threshold() {
        let guides = vec![entry("abrir caja")];
        assert!(find_best_match("facturación electrónica", guides.iter(), 0.75).is_none());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let guides = vec![entry("abrir caja")];
        // An exact match scores 1.0 and must survive a threshold of 1.0
        assert!(find_best_match("abrir caja", guides.iter(), 1.0).is_some());
    }

    #[test]
    fn test_tie_breaks_to_first_candidate() {
        // "ax" and "ay" score identically against "ab"
        let guides = vec![entry("ax"), entry("ay")];
        let found = find_best_match("ab", guides.iter(), 0.5);
        assert_eq!(found.map(|g| g.key.as_str()), Some("ax"));

        let reversed = vec![entry("ay"), entry("ax")];
        let found = find_best_match("ab", reversed.iter(), 0.5);
        assert_eq!(found.map(|g| g.key.as_str()), Some("ay"));
    }

    #[test]
    fn test_find_best_match_is_deterministic() {
        let guides = vec![entry("abrir caja"), entry("cerrar caja"), entry("arqueo")];
        let first = find_best_match("abrir", guides.iter(), 0.6).map(|g| g.key.clone());
        let second = find_best_match("abrir", guides.iter(), 0.6).map(|g| g.key.clone());
        assert_eq!(first, second);
    }

    #[test]
    fn test_find_best_match_empty_candidates() {
        let guides: Vec<GuideEntry> = Vec::new();
        assert!(find_best_match("anything", guides.iter(), 0.0).is_none());
    }
}
