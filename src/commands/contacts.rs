//! Contact commands: contacts, resolve.
//!
//! CHANGELOG:
//! - 10/17/2026 - Read-only store; added resolve
//! - 01/10/2026 - Implemented list with JSON file I/O

use super::EXIT_CLARIFY;
use crate::contacts::{resolve as resolve_name, Contact, ContactStore, ResolutionResult};
use crate::interpreter;
use crate::output::OutputControls;
use anyhow::Result;
use serde_json::json;
use std::path::Path;
use std::process::ExitCode;

/// List all contacts.
pub fn list(store: &ContactStore, path: &Path, output: &OutputControls) -> Result<ExitCode> {
    let all = store.all();

    if output.json {
        let contacts_vec: Vec<&Contact> = all.iter().collect();
        output.print(&contacts_vec);
    } else {
        if all.is_empty() {
            println!("No contacts found.");
            println!("Add {{\"Name\": \"phone\"}} entries to {}.", path.display());
            return Ok(ExitCode::SUCCESS);
        }

        println!("Contacts ({}):", all.len());
        println!("{}", "-".repeat(50));
        for contact in all {
            println!("{}: {}", contact.name, contact.phone);
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Resolve a name against the store and show which strategy matched.
pub fn resolve(store: &ContactStore, name: &str, output: &OutputControls) -> Result<ExitCode> {
    let result = resolve_name(name, store);

    match &result {
        ResolutionResult::Resolved {
            canonical_name,
            phone_identifier,
            match_kind,
        } => {
            output.report(&json!({"query": name, "result": &result}), || {
                format!("{} -> {} ({}) [{}]", name, canonical_name, phone_identifier, match_kind)
            });
            Ok(ExitCode::SUCCESS)
        }
        _ => {
            let prompt = interpreter::clarify(name, &result).map(|c| c.prompt());
            output.report(&json!({"query": name, "result": &result, "prompt": prompt}), || {
                prompt
                    .clone()
                    .unwrap_or_else(|| format!("Contact '{}' not found", name))
            });
            Ok(ExitCode::from(EXIT_CLARIFY))
        }
    }
}
