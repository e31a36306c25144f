//! Contact store - load and lookup contacts from JSON.
//!
//! CHANGELOG:
//! - 10/17/2026 - Accept the name -> phone object format, drop duplicate names on load
//! - 01/10/2026 - Added fuzzy matching with score threshold
//! - 01/10/2026 - Initial stub

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Default contacts.json path.
///
/// Tries multiple locations in order:
/// 1. WHATSAPP_CONTACTS_PATH env var
/// 2. <config dir>/wolfies-whatsapp/contacts.json, if it exists
/// 3. ./contacts.json
pub fn default_contacts_path() -> PathBuf {
    // 1. Check env var
    if let Ok(path) = std::env::var("WHATSAPP_CONTACTS_PATH") {
        return crate::config::expand_path(&path);
    }

    // 2. Per-user config directory
    if let Some(config_dir) = dirs::config_dir() {
        let path = config_dir.join("wolfies-whatsapp").join("contacts.json");
        if path.exists() {
            return path;
        }
    }

    // 3. Working directory
    PathBuf::from("contacts.json")
}

/// A contact from the contacts.json file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Canonical name, exactly as stored
    pub name: String,
    /// Phone identifier in whatever format the file uses
    pub phone: String,
}

impl Contact {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
        }
    }
}

/// Accepted contacts.json layouts.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ContactsFile {
    /// `{"contacts": [...]}`
    Wrapped { contacts: Vec<Contact> },
    /// `[...]`
    List(Vec<Contact>),
    /// `{"Alice Smith": "15551234567", ...}` (insertion order preserved)
    Map(serde_json::Map<String, serde_json::Value>),
}

/// Read-only contact store, loaded once per process.
#[derive(Debug, Clone, Default)]
pub struct ContactStore {
    contacts: Vec<Contact>,
}

impl ContactStore {
    /// Load contacts from a JSON file.
    ///
    /// Supports three formats:
    /// - `{"Name": "phone", ...}`
    /// - `{"contacts": [{"name": ..., "phone": ...}]}`
    /// - `[{"name": ..., "phone": ...}]` (flat array)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read contacts file: {:?}", path.as_ref()))?;
        Self::from_json(&content)
    }

    /// Parse contacts from JSON text.
    pub fn from_json(content: &str) -> Result<Self> {
        let file: ContactsFile =
            serde_json::from_str(content).with_context(|| "Failed to parse contacts JSON")?;

        let contacts = match file {
            ContactsFile::Wrapped { contacts } | ContactsFile::List(contacts) => contacts,
            ContactsFile::Map(map) => map
                .into_iter()
                .filter_map(|(name, value)| match value {
                    serde_json::Value::String(phone) => Some(Contact::new(name, phone)),
                    serde_json::Value::Number(n) => Some(Contact::new(name, n.to_string())),
                    other => {
                        tracing::warn!(contact = %name, value = %other, "skipping contact with non-string phone");
                        None
                    }
                })
                .collect(),
        };

        Ok(Self::from_contacts(contacts))
    }

    /// Build a store, dropping names that collide after trim + case-fold.
    pub fn from_contacts(contacts: Vec<Contact>) -> Self {
        let mut seen = HashSet::new();
        let contacts = contacts
            .into_iter()
            .filter(|c| {
                let key = normalize_name(&c.name);
                if key.is_empty() {
                    tracing::warn!("skipping contact with empty name");
                    return false;
                }
                if !seen.insert(key) {
                    tracing::warn!(contact = %c.name, "skipping duplicate contact name");
                    return false;
                }
                true
            })
            .collect();
        Self { contacts }
    }

    /// Load from a path, degrading to an empty store on any failure.
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path.as_ref()) {
            Ok(store) => {
                tracing::debug!(count = store.len(), path = ?path.as_ref(), "loaded contacts");
                store
            }
            Err(e) => {
                tracing::warn!("{:#}; continuing with an empty contact store", e);
                Self::empty()
            }
        }
    }

    /// Create an empty store (for when contacts aren't available).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Get all contacts, in file order.
    pub fn all(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Find a contact by name (exact, trimmed, case-insensitive).
    pub fn find_by_name(&self, name: &str) -> Option<&Contact> {
        let key = normalize_name(name);
        self.contacts.iter().find(|c| normalize_name(&c.name) == key)
    }

    /// Find a contact by phone number.
    pub fn find_by_phone(&self, phone: &str) -> Option<&Contact> {
        let normalized = normalize_phone(phone);
        if normalized.is_empty() {
            return None;
        }
        self.contacts
            .iter()
            .find(|c| normalize_phone(&c.phone) == normalized)
    }
}

/// Normalize a name for comparison: trimmed and case-folded.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Normalize a phone number to its digits (the form deep links expect).
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Heuristic: does free text look like a phone number rather than a name?
pub fn looks_like_phone(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty()
        && normalize_phone(trimmed).len() >= 6
        && trimmed
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("+1 (415) 555-1234"), "14155551234");
        assert_eq!(normalize_phone("+14155551234"), "14155551234");
    }

    #[test]
    fn test_load_map_format_preserves_order() {
        let store = ContactStore::from_json(
            r#"{"Zed Adams": "111111", "Alice Smith": "15551234567", "Bob": "222222"}"#,
        )
        .unwrap();
        let names: Vec<&str> = store.all().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Zed Adams", "Alice Smith", "Bob"]);
    }

    #[test]
    fn test_load_wrapped_and_list_formats() {
        let wrapped =
            ContactStore::from_json(r#"{"contacts": [{"name": "Alice", "phone": "1"}]}"#).unwrap();
        assert_eq!(wrapped.all(), &[Contact::new("Alice", "1")]);

        let list = ContactStore::from_json(r#"[{"name": "Bob", "phone": "2"}]"#).unwrap();
        assert_eq!(list.all(), &[Contact::new("Bob", "2")]);
    }

    #[test]
    fn test_numeric_phone_is_accepted() {
        let store = ContactStore::from_json(r#"{"Carol": 15550001111}"#).unwrap();
        assert_eq!(store.find_by_name("carol").unwrap().phone, "15550001111");
    }

    #[test]
    fn test_duplicate_names_keep_first() {
        let store = ContactStore::from_json(
            r#"{"Alice Smith": "1", " alice smith ": "2", "Bob": "3"}"#,
        )
        .unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.find_by_name("ALICE SMITH").unwrap().phone, "1");
    }

    #[test]
    fn test_find_by_phone() {
        let store = ContactStore::from_contacts(vec![Contact::new("Alice", "+1 (555) 123-4567")]);
        assert_eq!(store.find_by_phone("15551234567").unwrap().name, "Alice");
        assert!(store.find_by_phone("").is_none());
    }

    #[test]
    fn test_missing_file_degrades_to_empty() {
        let store = ContactStore::load_or_empty("/nonexistent/dir/contacts.json");
        assert!(store.is_empty());
    }

    #[test]
    fn test_invalid_file_degrades_to_empty() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json at all").unwrap();
        assert!(ContactStore::load(file.path()).is_err());
        assert!(ContactStore::load_or_empty(file.path()).is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"Alice Smith": "15551234567"}}"#).unwrap();
        let store = ContactStore::load_or_empty(file.path());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_looks_like_phone() {
        assert!(looks_like_phone("+1 555 123 4567"));
        assert!(looks_like_phone("15551234567"));
        assert!(!looks_like_phone("alice"));
        assert!(!looks_like_phone("12345"));
        assert!(!looks_like_phone("room 101 at 5551234"));
    }
}
