//! Keyword extraction: frequency-ranked significant words from free text.
//!
//! Pure-Rust and deterministic. Used by the offline proposal template to
//! personalise the opening line with terms taken from the job description.

use std::collections::HashMap;

/// Tokens of this many characters or fewer are never keywords.
const MIN_EXCLUSIVE_LEN: usize = 3;

/// Filler words dropped before counting.
const STOP_WORDS: &[&str] = &[
    "and", "the", "to", "of", "for", "in", "on", "with", "a", "an", "is", "are", "that", "this",
    "be", "as",
];

/// Returns up to `count` of the most frequent significant words in `text`.
///
/// Normalisation: lowercase, drop every character that is neither a word
/// character (`[A-Za-z0-9_]`) nor whitespace, split on whitespace runs.
/// Tokens of length ≤ 3 and stop words are discarded.
///
/// Ties in frequency keep first-occurrence order, so the result is fully
/// determined by the input. Never fails: degenerate input yields `vec![]`.
pub fn extract_keywords(text: &str, count: usize) -> Vec<String> {
    if count == 0 {
        return Vec::new();
    }

    let normalized: String = text
        .to_lowercase()
        .chars()
        .filter(|c| is_word_char(*c) || c.is_whitespace())
        .collect();

    // (word, frequency) in first-seen order, plus an index for O(1) lookups.
    let mut ranked: Vec<(String, u32)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for token in normalized.split_whitespace().filter(|t| is_significant(t)) {
        match index.get(token) {
            Some(&i) => ranked[i].1 += 1,
            None => {
                index.insert(token.to_string(), ranked.len());
                ranked.push((token.to_string(), 1));
            }
        }
    }

    // `sort_by` is stable: equal counts stay in first-occurrence order.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    ranked
        .into_iter()
        .take(count)
        .map(|(word, _)| word)
        .collect()
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_significant(token: &str) -> bool {
    token.chars().count() > MIN_EXCLUSIVE_LEN && !STOP_WORDS.contains(&token)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DASHBOARD_JD: &str = "We need React and TypeScript skills for a dashboard project";

    #[test]
    fn test_empty_text_yields_no_keywords() {
        assert!(extract_keywords("", 5).is_empty());
    }

    #[test]
    fn test_zero_count_yields_no_keywords() {
        assert!(extract_keywords(DASHBOARD_JD, 0).is_empty());
    }

    #[test]
    fn test_punctuation_only_yields_no_keywords() {
        assert!(extract_keywords("!!! ??? ... ,,, ---", 5).is_empty());
    }

    #[test]
    fn test_short_words_and_stop_words_are_dropped() {
        let keywords = extract_keywords(DASHBOARD_JD, 10);
        assert_eq!(
            keywords,
            vec!["need", "react", "typescript", "skills", "dashboard", "project"]
        );
        // "this"/"that" are four letters long but still stop words.
        assert!(extract_keywords("this that this that", 5).is_empty());
    }

    #[test]
    fn test_orders_by_descending_frequency() {
        let text = "rust tokio rust axum tokio rust";
        assert_eq!(extract_keywords(text, 3), vec!["rust", "tokio", "axum"]);
    }

    #[test]
    fn test_ties_keep_first_occurrence_order() {
        let text = "zebra apple mango apple zebra mango";
        assert_eq!(extract_keywords(text, 3), vec!["zebra", "apple", "mango"]);
    }

    #[test]
    fn test_count_limits_result_length() {
        let text = "alpha bravo charlie delta echo foxtrot";
        assert_eq!(extract_keywords(text, 2), vec!["alpha", "bravo"]);
    }

    #[test]
    fn test_fewer_qualifying_words_than_requested_is_not_padded() {
        assert_eq!(extract_keywords("Kubernetes", 5), vec!["kubernetes"]);
    }

    #[test]
    fn test_case_insensitive_counting() {
        let text = "Design DESIGN design Build";
        assert_eq!(extract_keywords(text, 2), vec!["design", "build"]);
    }

    #[test]
    fn test_punctuation_is_stripped_inside_tokens() {
        // "Next.js" collapses to "nextjs", "e-commerce" to "ecommerce".
        let keywords = extract_keywords("Next.js e-commerce, (urgent)!", 5);
        assert_eq!(keywords, vec!["nextjs", "ecommerce", "urgent"]);
    }

    #[test]
    fn test_non_ascii_letters_are_stripped() {
        assert_eq!(extract_keywords("café résumé naïve", 5), vec!["rsum", "nave"]);
    }

    #[test]
    fn test_output_invariants_hold() {
        let text = "The quick brown fox jumps over the lazy dog; THE DOG sleeps, \
                    and the fox is quick as a fox with foxes that are quick.";
        let keywords = extract_keywords(text, 5);
        assert!(keywords.len() <= 5);
        for word in &keywords {
            assert!(word.chars().count() > 3, "{word} too short");
            assert!(!STOP_WORDS.contains(&word.as_str()), "{word} is a stop word");
            assert_eq!(word, &word.to_lowercase());
        }
        assert_eq!(keywords[0], "quick");
    }

    #[test]
    fn test_is_deterministic() {
        let text = "ship launch deliver ship launch deliver improve";
        let first = extract_keywords(text, 4);
        for _ in 0..10 {
            assert_eq!(extract_keywords(text, 4), first);
        }
    }
}
