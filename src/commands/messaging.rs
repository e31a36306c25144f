//! Messaging commands: send, command.
//!
//! CHANGELOG:
//! - 10/17/2026 - Dispatch through the fallback channels; added the
//!   utterance-driven command flow
//! - 01/10/2026 - Initial implementation

use super::{EXIT_CLARIFY, EXIT_FAILURE};
use crate::contacts::manager::looks_like_phone;
use crate::contacts::{resolve, ContactStore, ResolutionResult};
use crate::dispatch::{DispatchOutcome, Dispatcher, SendRequest, Signal, Target};
use crate::interpreter::{self, Clarification};
use crate::output::OutputControls;
use anyhow::Result;
use serde_json::json;
use std::process::ExitCode;
use std::time::Duration;

/// Per-send knobs shared by `send` and `command`.
#[derive(Debug, Clone, Copy)]
pub struct SendSettings {
    pub repeats: u32,
    pub delay: Duration,
    pub dry_run: bool,
}

impl Default for SendSettings {
    fn default() -> Self {
        Self {
            repeats: 1,
            delay: Duration::from_secs(1),
            dry_run: false,
        }
    }
}

impl SendSettings {
    fn apply(&self, request: SendRequest) -> SendRequest {
        request
            .with_repeats(self.repeats)
            .with_delay(self.delay)
            .with_dry_run(self.dry_run)
    }
}

/// Split a free-form recipient into (phone, name): six or more digits make
/// it a phone number.
pub fn classify_recipient(recipient: &str) -> (Option<String>, Option<String>) {
    let recipient = recipient.trim();
    if recipient.is_empty() {
        (None, None)
    } else if looks_like_phone(recipient) {
        (Some(recipient.to_string()), None)
    } else {
        (None, Some(recipient.to_string()))
    }
}

/// Work out who to send to from `--phone`/`--name`.
///
/// A name that resolves picks up the contact's phone, so the direct link
/// can be tried. A name that does not resolve is still usable by the
/// search channels. A bare phone picks up the contact name when it is known.
pub fn build_target(store: &ContactStore, phone: Option<&str>, name: Option<&str>) -> Option<Target> {
    let phone = phone.map(str::trim).filter(|p| !p.is_empty());
    let name = name.map(str::trim).filter(|n| !n.is_empty());

    match (phone, name) {
        (Some(phone), Some(name)) => Target::new(Some(name.to_string()), Some(phone.to_string())),
        (Some(phone), None) => {
            let known = store.find_by_phone(phone).map(|c| c.name.clone());
            Target::new(known, Some(phone.to_string()))
        }
        (None, Some(name)) => match Target::from_resolution(&resolve(name, store)) {
            Some(target) => {
                tracing::info!("resolved '{}' -> {}", name, target);
                Some(target)
            }
            None => {
                tracing::info!("'{}' not in contacts; will search by name", name);
                Target::name(name)
            }
        },
        (None, None) => None,
    }
}

/// Send a message via the fallback channels.
pub fn send(
    store: &ContactStore,
    dispatcher: &Dispatcher,
    phone: Option<&str>,
    name: Option<&str>,
    message: &str,
    settings: SendSettings,
    output: &OutputControls,
) -> Result<ExitCode> {
    let Some(target) = build_target(store, phone, name) else {
        report_error("Provide either --phone or --name to choose the recipient.", output);
        return Ok(ExitCode::from(EXIT_FAILURE));
    };

    if message.trim().is_empty() {
        report_error("Empty message; nothing to send.", output);
        return Ok(ExitCode::from(EXIT_FAILURE));
    }

    let request = settings.apply(SendRequest::new(target, message));
    let outcome = dispatcher.dispatch(&request);
    Ok(finish(&request, &outcome, output))
}

/// Interpret an utterance, resolve its recipient, then send.
///
/// Nothing is sent while a follow-up question is pending: the prompt is
/// printed and the exit code is [`EXIT_CLARIFY`].
pub fn command(
    store: &ContactStore,
    dispatcher: &Dispatcher,
    utterance: &str,
    message: Option<&str>,
    confirm: Option<&str>,
    settings: SendSettings,
    output: &OutputControls,
) -> Result<ExitCode> {
    if interpreter::is_exit_command(utterance) {
        output.report(&json!({"status": "exit"}), || "Goodbye.".to_string());
        return Ok(ExitCode::SUCCESS);
    }

    if !interpreter::is_send_command(utterance) {
        output.report(&json!({"status": "ignored", "utterance": utterance}), || {
            "Command ignored. Say 'Send message to [Name]'.".to_string()
        });
        return Ok(ExitCode::from(EXIT_CLARIFY));
    }

    let interpretation = interpreter::extract_target_and_body(utterance);
    let resolution = resolve(&interpretation.target_hint, store);

    if let Some(clarification) = interpreter::clarify(&interpretation.target_hint, &resolution) {
        return Ok(ask(&clarification, output));
    }

    let ResolutionResult::Resolved { canonical_name, .. } = &resolution else {
        return Ok(ask(&Clarification::AskRecipient, output));
    };

    let Some(message) = message.map(str::trim).filter(|m| !m.is_empty()) else {
        return Ok(ask(
            &Clarification::AskMessage {
                recipient: canonical_name.clone(),
            },
            output,
        ));
    };

    if let Some(reply) = confirm {
        if !interpreter::is_confirmation(reply) {
            output.report(&json!({"status": "cancelled", "recipient": canonical_name}), || {
                "Cancelled.".to_string()
            });
            return Ok(ExitCode::from(EXIT_FAILURE));
        }
    }

    let request = match SendRequest::from_resolution(&resolution, &interpretation.target_hint, message) {
        Ok(request) => settings.apply(request),
        Err(e) => {
            report_error(&e.to_string(), output);
            return Ok(ExitCode::from(EXIT_FAILURE));
        }
    };

    let outcome = dispatcher.dispatch(&request);
    Ok(finish(&request, &outcome, output))
}

fn ask(clarification: &Clarification, output: &OutputControls) -> ExitCode {
    output.report(
        &json!({
            "status": "clarify",
            "clarification": clarification,
            "prompt": clarification.prompt(),
        }),
        || clarification.prompt(),
    );
    ExitCode::from(EXIT_CLARIFY)
}

fn report_error(message: &str, output: &OutputControls) {
    if output.json {
        println!("{}", crate::output::format_error(message));
    } else {
        eprintln!("Error: {}", message);
    }
}

/// Print the verdict and map it to an exit code.
fn finish(request: &SendRequest, outcome: &DispatchOutcome, output: &OutputControls) -> ExitCode {
    output.report(outcome, || describe(request, outcome));
    if outcome.succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_FAILURE)
    }
}

/// One-line human summary of an outcome.
pub fn describe(request: &SendRequest, outcome: &DispatchOutcome) -> String {
    let target = request.target();
    let Some(channel) = outcome.trail.iter().rev().find(|r| r.succeeded) else {
        let tried: Vec<String> = outcome.trail.iter().map(|r| r.channel.to_string()).collect();
        return if tried.is_empty() {
            format!("Failed to send to {}: no channel could address it", target)
        } else {
            format!("Failed to send to {} (tried {})", target, tried.join(", "))
        };
    };

    match outcome.signal {
        Signal::Drafted => format!(
            "Dry run: message typed for {} via {}, not sent",
            target, channel.channel
        ),
        Signal::KeystrokeInjected => format!(
            "Message handed to {} via {} (send key injected)",
            target, channel.channel
        ),
        _ => format!(
            "Message sent to {} via {} ({} time{})",
            target,
            channel.channel,
            outcome.attempts,
            if outcome.attempts == 1 { "" } else { "s" }
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contacts::Contact;

    fn store() -> ContactStore {
        ContactStore::from_contacts(vec![
            Contact::new("Alice Smith", "+1 555 123 4567"),
            Contact::new("Bob Jones", "15559876543"),
        ])
    }

    #[test]
    fn test_classify_recipient() {
        assert_eq!(classify_recipient("+1 555 123 4567"), (Some("+1 555 123 4567".into()), None));
        assert_eq!(classify_recipient("alice"), (None, Some("alice".into())));
        assert_eq!(classify_recipient("   "), (None, None));
    }

    #[test]
    fn test_target_from_resolved_name() {
        let target = build_target(&store(), None, Some("alice")).unwrap();
        assert_eq!(target.display_name(), Some("Alice Smith"));
        assert_eq!(target.phone_digits().as_deref(), Some("15551234567"));
    }

    #[test]
    fn test_target_from_unknown_name_is_search_only() {
        let target = build_target(&store(), None, Some("Zed")).unwrap();
        assert_eq!(target.display_name(), Some("Zed"));
        assert!(target.phone_digits().is_none());
    }

    #[test]
    fn test_target_from_phone_picks_up_name() {
        let target = build_target(&store(), Some("15559876543"), None).unwrap();
        assert_eq!(target.display_name(), Some("Bob Jones"));
    }

    #[test]
    fn test_target_requires_something() {
        assert!(build_target(&store(), None, None).is_none());
        assert!(build_target(&store(), Some(" "), Some("")).is_none());
    }
}
