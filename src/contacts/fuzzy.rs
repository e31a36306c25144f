//! Fuzzy name matching using strsim.
//!
//! Scores are normalized to 0.0 - 1.0 where 1.0 is identical. Both inputs
//! are case-folded before scoring.
//!
//! CHANGELOG:
//! - 10/17/2026 - Score on normalized Levenshtein with a token-sorted variant, 0.6 threshold
//! - 01/10/2026 - Initial stub

use strsim::normalized_levenshtein;

/// Minimum score for a fuzzy match to count (0.0 - 1.0).
pub const DEFAULT_THRESHOLD: f64 = 0.6;

/// Fuzzy match result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyMatch {
    pub score: f64,
    pub strategy: &'static str,
}

/// Match two strings and keep the best-scoring strategy.
///
/// - levenshtein: edit distance over the whole string (typos, misheard letters)
/// - token_sort: same, after sorting words (handles "smith alice")
pub fn multi_match(query: &str, target: &str) -> FuzzyMatch {
    let query_lower = query.trim().to_lowercase();
    let target_lower = target.trim().to_lowercase();

    let strategies = [
        ("levenshtein", normalized_levenshtein(&query_lower, &target_lower)),
        ("token_sort", token_sort_ratio(&query_lower, &target_lower)),
    ];

    // First strategy wins ties so the reported name is stable.
    strategies
        .into_iter()
        .fold(None::<FuzzyMatch>, |best, (strategy, score)| match best {
            Some(b) if b.score >= score => Some(b),
            _ => Some(FuzzyMatch { score, strategy }),
        })
        .unwrap_or(FuzzyMatch {
            score: 0.0,
            strategy: "none",
        })
}

/// Token sort ratio - sort words before comparing.
fn token_sort_ratio(a: &str, b: &str) -> f64 {
    let mut a_tokens: Vec<&str> = a.split_whitespace().collect();
    let mut b_tokens: Vec<&str> = b.split_whitespace().collect();
    a_tokens.sort_unstable();
    b_tokens.sort_unstable();

    normalized_levenshtein(&a_tokens.join(" "), &b_tokens.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        let result = multi_match("John Doe", "John Doe");
        assert!(result.score > 0.99);
    }

    #[test]
    fn test_case_insensitive() {
        let result = multi_match("john doe", "John Doe");
        assert!(result.score > 0.99);
    }

    #[test]
    fn test_word_order() {
        let result = multi_match("Doe John", "John Doe");
        assert!(result.score > 0.99, "Score was {}", result.score);
        assert_eq!(result.strategy, "token_sort");
    }

    #[test]
    fn test_typo_passes_threshold() {
        assert!(multi_match("alise smith", "Alice Smith").score >= DEFAULT_THRESHOLD);
        assert!(multi_match("jon", "John").score >= DEFAULT_THRESHOLD);
    }

    #[test]
    fn test_unrelated_fails_threshold() {
        assert!(multi_match("xyz", "Alice Smith").score < DEFAULT_THRESHOLD);
        assert!(multi_match("pizza tonight", "Bob").score < DEFAULT_THRESHOLD);
    }

    #[test]
    fn test_empty_strings() {
        assert_eq!(multi_match("", "").score, 1.0);
        assert_eq!(multi_match("", "Bob").score, 0.0);
    }
}
