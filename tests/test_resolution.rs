//! Contact store loading and name resolution against real files.

use std::io::Write;
use tempfile::NamedTempFile;
use wolfies_whatsapp::contacts::{resolve, ContactStore, MatchKind, ResolutionResult};
use wolfies_whatsapp::interpreter::{clarify, extract_target_and_body, Clarification};

fn store_from(json: &str) -> ContactStore {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    ContactStore::load(file.path()).unwrap()
}

fn resolved(result: &ResolutionResult) -> Option<(&str, &str, MatchKind)> {
    match result {
        ResolutionResult::Resolved {
            canonical_name,
            phone_identifier,
            match_kind,
        } => Some((canonical_name, phone_identifier, *match_kind)),
        _ => None,
    }
}

#[test]
fn test_map_file_keeps_insertion_order() {
    let store = store_from(r#"{"Alicia Keys": "15550000001", "Alice Smith": "15551234567"}"#);
    assert_eq!(store.all()[0].name, "Alicia Keys");
    assert_eq!(
        resolved(&resolve("ali", &store)),
        Some(("Alicia Keys", "15550000001", MatchKind::Substring))
    );
}

#[test]
fn test_wrapped_and_list_files() {
    let wrapped = store_from(r#"{"contacts": [{"name": "Alice Smith", "phone": "15551234567"}]}"#);
    let list = store_from(r#"[{"name": "Alice Smith", "phone": "15551234567"}]"#);
    assert_eq!(wrapped.all(), list.all());
}

#[test]
fn test_duplicate_names_keep_first() {
    let store = store_from(
        r#"[{"name": "Bob", "phone": "111111"}, {"name": "  BOB ", "phone": "222222"}]"#,
    );
    assert_eq!(store.len(), 1);
    assert_eq!(
        resolved(&resolve("bob", &store)),
        Some(("Bob", "111111", MatchKind::Exact))
    );
}

#[test]
fn test_unreadable_store_is_empty_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    assert!(ContactStore::load_or_empty(dir.path().join("missing.json")).is_empty());

    let mut bad = NamedTempFile::new().unwrap();
    bad.write_all(b"{not json").unwrap();
    assert!(ContactStore::load_or_empty(bad.path()).is_empty());
}

#[test]
fn test_message_to_alice_scenario() {
    let store = store_from(r#"{"Alice Smith": "15551234567"}"#);
    let interpretation = extract_target_and_body("message to alice");
    let result = resolve(&interpretation.target_hint, &store);

    assert_eq!(
        resolved(&result),
        Some(("Alice Smith", "15551234567", MatchKind::Substring))
    );
    assert_eq!(clarify(&interpretation.target_hint, &result), None);
}

#[test]
fn test_long_text_is_never_a_name() {
    let store = store_from(r#"{"Alice Smith": "15551234567"}"#);
    let result = resolve("alice smith is running late", &store);
    assert_eq!(result, ResolutionResult::NotFound);
    assert!(matches!(
        clarify("alice smith is running late", &result),
        Some(Clarification::NotAName { .. })
    ));
}

#[test]
fn test_misheard_name_and_threshold() {
    let store = store_from(r#"{"Alice Smith": "15551234567", "Bob Jones": "15559876543"}"#);
    assert_eq!(
        resolved(&resolve("alise smith", &store)).map(|r| r.2),
        Some(MatchKind::Fuzzy)
    );
    assert_eq!(resolve("xyz", &store), ResolutionResult::NotFound);
}

#[test]
fn test_resolution_is_deterministic() {
    let store = store_from(r#"{"Jon Smith": "1111111", "Jan Smith": "2222222"}"#);
    // "jen smith" is one edit from both; the earlier contact wins every time.
    let first = resolve("jen smith", &store);
    for _ in 0..10 {
        assert_eq!(resolve("jen smith", &store), first);
    }
    assert_eq!(resolved(&first).map(|r| r.0), Some("Jon Smith"));
}
