//! Product-name resolution for misheard speech.

use tracing::debug;

use stockcast_core::CategoryCode;
use stockcast_dataset::CategoryEncoder;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Resolution {
    Exact(CategoryCode),
    /// Approximate match with its 0-100 similarity score.
    Fuzzy { code: CategoryCode, score: u8 },
    /// Nothing scored above the threshold; carries the best candidate for logging.
    NotFound { best: Option<(CategoryCode, u8)> },
}

impl Resolution {
    pub fn code(&self) -> Option<CategoryCode> {
        match self {
            Resolution::Exact(code) | Resolution::Fuzzy { code, .. } => Some(*code),
            Resolution::NotFound { .. } => None,
        }
    }
}

/// Lowercase, turn anything that is not alphanumeric into a space, collapse runs.
fn normalize(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .flat_map(char::to_lowercase)
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Weight of the word-order-insensitive view.
const TOKEN_SORT_SCALE: f64 = 0.95;
/// Length ratio from which substring windows are considered.
const PARTIAL_MIN_LENGTH_RATIO: f64 = 1.5;

/// Similarity on a 0-100 scale over normalized text.
///
/// Best of three views: normalized Levenshtein, the same over alphabetically
/// sorted words, and, once one side is at least 1.5 times longer, the best
/// window of the longer side. Derived views are scaled down so a whole-string
/// match always scores highest.
pub fn similarity(a: &str, b: &str) -> u8 {
    let (a, b) = (normalize(a), normalize(b));
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let (sorted_a, sorted_b) = (sort_words(&a), sort_words(&b));
    let mut best = strsim::normalized_levenshtein(&a, &b)
        .max(strsim::normalized_levenshtein(&sorted_a, &sorted_b) * TOKEN_SORT_SCALE);

    let (len_a, len_b) = (a.chars().count() as f64, b.chars().count() as f64);
    let length_ratio = len_a.max(len_b) / len_a.min(len_b);
    if length_ratio >= PARTIAL_MIN_LENGTH_RATIO {
        let scale = if length_ratio > 8.0 { 0.6 } else { 0.9 };
        best = best
            .max(partial_ratio(&a, &b) * scale)
            .max(partial_ratio(&sorted_a, &sorted_b) * TOKEN_SORT_SCALE * scale);
    }

    (best * 100.0).round().clamp(0.0, 100.0) as u8
}

fn sort_words(s: &str) -> String {
    let mut words: Vec<&str> = s.split_whitespace().collect();
    words.sort_unstable();
    words.join(" ")
}

/// Best normalized Levenshtein of the shorter string against every equally
/// long window of the longer one.
fn partial_ratio(a: &str, b: &str) -> f64 {
    let (short, long) = if a.chars().count() <= b.chars().count() { (a, b) } else { (b, a) };
    let long: Vec<char> = long.chars().collect();
    let width = short.chars().count();
    long.windows(width)
        .map(|w| strsim::normalized_levenshtein(short, &w.iter().collect::<String>()))
        .fold(0.0, f64::max)
}

/// Resolve a spoken product name against the known labels.
///
/// An exact label wins outright. Otherwise the best-scoring label is accepted
/// only when its score is strictly above `threshold`; ties keep the lowest code.
pub fn resolve_product(query: &str, encoder: &CategoryEncoder, threshold: u8) -> Resolution {
    if let Some(code) = encoder.encode(query) {
        return Resolution::Exact(code);
    }

    let mut best: Option<(CategoryCode, u8)> = None;
    for (code, label) in encoder.iter() {
        let score = similarity(query, label);
        debug!(query, label, score, "fuzzy candidate scored");
        if best.is_none_or(|(_, s)| score > s) {
            best = Some((code, score));
        }
    }

    match best {
        Some((code, score)) if score > threshold => Resolution::Fuzzy { code, score },
        _ => Resolution::NotFound { best },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn encoder() -> CategoryEncoder {
        CategoryEncoder::fit(["Widget", "Gadget"])
    }

    #[test]
    fn exact_label_is_used_directly() {
        assert_eq!(
            resolve_product("Widget", &encoder(), 80),
            Resolution::Exact(CategoryCode::new(1))
        );
    }

    #[test]
    fn one_extra_letter_still_resolves() {
        let r = resolve_product("Widgett", &encoder(), 80);
        assert_eq!(r.code(), Some(CategoryCode::new(1)));
        assert!(matches!(r, Resolution::Fuzzy { score, .. } if score > 80));
    }

    #[test]
    fn casing_and_punctuation_do_not_matter_for_fuzzy_scores() {
        assert_eq!(similarity("widget!", "Widget"), 100);
        let r = resolve_product("widget", &encoder(), 80);
        assert_eq!(r, Resolution::Fuzzy { code: CategoryCode::new(1), score: 100 });
    }

    #[test]
    fn unrelated_name_is_not_found() {
        let r = resolve_product("Tornillo", &encoder(), 80);
        assert!(matches!(r, Resolution::NotFound { best: Some(_) }));
        assert_eq!(r.code(), None);
    }

    #[test]
    fn threshold_is_strict() {
        // "Widgets" vs "Widget": distance 1 over 7 chars scores 86.
        assert_eq!(similarity("Widgets", "Widget"), 86);
        assert!(matches!(resolve_product("Widgets", &encoder(), 86), Resolution::NotFound { .. }));
        assert!(matches!(resolve_product("Widgets", &encoder(), 85), Resolution::Fuzzy { .. }));
    }

    #[test]
    fn trailing_words_and_reordered_words_still_resolve() {
        let enc = CategoryEncoder::fit(["Caja Grande", "Widget"]);
        assert_eq!(
            resolve_product("Widget por favor", &enc, 80),
            Resolution::Fuzzy { code: CategoryCode::new(1), score: 90 }
        );
        assert_eq!(
            resolve_product("grande caja", &enc, 80),
            Resolution::Fuzzy { code: CategoryCode::new(0), score: 95 }
        );
    }

    #[test]
    fn short_typos_keep_their_edit_distance_score() {
        assert_eq!(similarity("Tornilo", "Tornillo"), 88);
        assert_eq!(similarity("Widgett", "Widget"), 86);
        assert!(similarity("Escalera", "Widget") < 50);
        assert!(similarity("Escalera", "Bolt") < 50);
    }

    #[test]
    fn empty_query_or_table_never_matches() {
        assert!(matches!(resolve_product("", &encoder(), 80), Resolution::NotFound { .. }));
        let empty = CategoryEncoder::default();
        assert_eq!(resolve_product("Widget", &empty, 80), Resolution::NotFound { best: None });
    }

    proptest! {
        /// Property: every known label resolves exactly to its own code.
        #[test]
        fn known_labels_resolve_exactly(labels in prop::collection::vec("[A-Za-z]{1,10}", 1..10)) {
            let enc = CategoryEncoder::fit(labels.iter().map(String::as_str));
            for (code, label) in enc.iter() {
                prop_assert_eq!(resolve_product(label, &enc, 80), Resolution::Exact(code));
            }
        }

        #[test]
        fn similarity_is_bounded(a in ".{0,20}", b in ".{0,20}") {
            prop_assert!(similarity(&a, &b) <= 100);
        }

        #[test]
        fn similarity_is_symmetric(a in "[a-z ]{0,20}", b in "[a-z ]{0,20}") {
            prop_assert_eq!(similarity(&a, &b), similarity(&b, &a));
        }
    }
}
