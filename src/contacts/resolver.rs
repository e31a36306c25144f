//! Contact resolution: free text -> canonical contact.
//!
//! Strategies run in strict priority order and the first hit wins:
//! exact (trimmed, case-folded), substring, then fuzzy similarity.
//!
//! CHANGELOG:
//! - 10/17/2026 - Initial implementation

use super::fuzzy;
use super::manager::{normalize_name, Contact, ContactStore};
use crate::error::ResolveError;
use serde::Serialize;
use std::fmt;

/// References longer than this are treated as message text, not names.
pub const MAX_NAME_WORDS: usize = 4;

/// Which strategy produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    Substring,
    Fuzzy,
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MatchKind::Exact => "exact",
            MatchKind::Substring => "substring",
            MatchKind::Fuzzy => "fuzzy",
        })
    }
}

/// Result of resolving a contact reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResolutionResult {
    Resolved {
        canonical_name: String,
        phone_identifier: String,
        match_kind: MatchKind,
    },
    /// Reserved: the scoring below always keeps a single best candidate.
    Ambiguous { candidates: Vec<String> },
    NotFound,
}

impl ResolutionResult {
    fn resolved(contact: &Contact, match_kind: MatchKind) -> Self {
        ResolutionResult::Resolved {
            canonical_name: contact.name.clone(),
            phone_identifier: contact.phone.clone(),
            match_kind,
        }
    }

    /// Convert to a `Result`, naming the original query in the error.
    pub fn into_result(self, query: &str) -> Result<Self, ResolveError> {
        match self {
            ResolutionResult::Resolved { .. } => Ok(self),
            ResolutionResult::Ambiguous { candidates } => Err(ResolveError::Ambiguous {
                query: query.to_string(),
                candidates,
            }),
            ResolutionResult::NotFound => Err(ResolveError::NotFound(query.to_string())),
        }
    }
}

/// True when the text has too many words to plausibly be a name.
pub fn is_too_long_for_name(raw_text: &str) -> bool {
    raw_text.split_whitespace().count() > MAX_NAME_WORDS
}

/// Resolve free text against the contact store.
///
/// Deterministic: the same store and text always give the same result.
/// Ties (substring or equal fuzzy scores) go to the earliest contact in
/// store order.
pub fn resolve(raw_text: &str, store: &ContactStore) -> ResolutionResult {
    let query = normalize_name(raw_text);
    if query.is_empty() || is_too_long_for_name(&query) {
        return ResolutionResult::NotFound;
    }

    // 1. Exact (store names are unique under this normalization)
    if let Some(contact) = store.find_by_name(&query) {
        return ResolutionResult::resolved(contact, MatchKind::Exact);
    }

    // 2. Substring, first in store order
    if let Some(contact) = store
        .all()
        .iter()
        .find(|c| c.name.to_lowercase().contains(&query))
    {
        return ResolutionResult::resolved(contact, MatchKind::Substring);
    }

    // 3. Fuzzy, best score above threshold
    let mut best: Option<(&Contact, f64)> = None;
    for contact in store.all() {
        let score = fuzzy::multi_match(&query, &contact.name).score;
        tracing::trace!(contact = %contact.name, score, "fuzzy score");
        if score >= fuzzy::DEFAULT_THRESHOLD
            && best.as_ref().map_or(true, |(_, best_score)| score > *best_score)
        {
            best = Some((contact, score));
        }
    }

    match best {
        Some((contact, score)) => {
            tracing::debug!(query = %query, contact = %contact.name, score, "fuzzy match");
            ResolutionResult::resolved(contact, MatchKind::Fuzzy)
        }
        None => ResolutionResult::NotFound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ContactStore {
        ContactStore::from_contacts(vec![
            Contact::new("Alice Smith", "15551230001"),
            Contact::new("Bob Jones", "15551230002"),
            Contact::new("Alicia Keys", "15551230003"),
            Contact::new("Mom", "15551230004"),
        ])
    }

    fn name_of(result: &ResolutionResult) -> Option<(&str, MatchKind)> {
        match result {
            ResolutionResult::Resolved {
                canonical_name,
                match_kind,
                ..
            } => Some((canonical_name.as_str(), *match_kind)),
            _ => None,
        }
    }

    #[test]
    fn test_exact_any_case_and_whitespace() {
        let store = store();
        for raw in ["Alice Smith", "alice smith", "  ALICE SMITH  ", "aLiCe SmItH\t"] {
            let result = resolve(raw, &store);
            assert_eq!(
                result,
                ResolutionResult::Resolved {
                    canonical_name: "Alice Smith".to_string(),
                    phone_identifier: "15551230001".to_string(),
                    match_kind: MatchKind::Exact,
                },
                "raw = {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_exact_beats_substring() {
        // "mom" is also a substring of nothing else, but exact must win first
        assert_eq!(name_of(&resolve("MOM", &store())), Some(("Mom", MatchKind::Exact)));
    }

    #[test]
    fn test_substring_first_in_store_order() {
        // "ali" is inside both "Alice Smith" and "Alicia Keys"
        assert_eq!(
            name_of(&resolve("ali", &store())),
            Some(("Alice Smith", MatchKind::Substring))
        );
        assert_eq!(
            name_of(&resolve("jones", &store())),
            Some(("Bob Jones", MatchKind::Substring))
        );
    }

    #[test]
    fn test_fuzzy_typo() {
        assert_eq!(
            name_of(&resolve("bob jomes", &store())),
            Some(("Bob Jones", MatchKind::Fuzzy))
        );
    }

    #[test]
    fn test_fuzzy_word_order() {
        assert_eq!(
            name_of(&resolve("smith alice", &store())),
            Some(("Alice Smith", MatchKind::Fuzzy))
        );
    }

    #[test]
    fn test_below_threshold_not_found() {
        assert_eq!(resolve("zebra", &store()), ResolutionResult::NotFound);
    }

    #[test]
    fn test_more_than_four_words_not_found() {
        let store = ContactStore::from_contacts(vec![Contact::new(
            "please call me back soon",
            "1",
        )]);
        assert_eq!(
            resolve("please call me back soon", &store),
            ResolutionResult::NotFound
        );
        assert_eq!(
            resolve("i will be late tonight", &self::store()),
            ResolutionResult::NotFound
        );
    }

    #[test]
    fn test_empty_query_not_found() {
        assert_eq!(resolve("   ", &store()), ResolutionResult::NotFound);
        assert_eq!(resolve("alice", &ContactStore::empty()), ResolutionResult::NotFound);
    }

    #[test]
    fn test_fuzzy_tie_keeps_store_order() {
        let store = ContactStore::from_contacts(vec![
            Contact::new("Dana", "1"),
            Contact::new("Dina", "2"),
        ]);
        // "dena" is one edit from both
        assert_eq!(name_of(&resolve("dena", &store)), Some(("Dana", MatchKind::Fuzzy)));
    }

    #[test]
    fn test_deterministic() {
        let store = store();
        let first = resolve("alcia", &store);
        for _ in 0..10 {
            assert_eq!(resolve("alcia", &store), first);
        }
    }

    #[test]
    fn test_into_result() {
        let err = resolve("zebra", &store()).into_result("zebra").unwrap_err();
        assert_eq!(err, ResolveError::NotFound("zebra".to_string()));
        assert!(resolve("bob", &store()).into_result("bob").is_ok());
    }

    #[test]
    fn test_serialize_tagged() {
        let json = serde_json::to_value(resolve("mom", &store())).unwrap();
        assert_eq!(json["status"], "resolved");
        assert_eq!(json["match_kind"], "exact");
        assert_eq!(json["canonical_name"], "Mom");
    }
}
