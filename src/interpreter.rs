//! Command interpretation: pull a recipient hint out of a free-text utterance.
//!
//! Single pass over the text, no grammar. Anything it cannot settle is left
//! for a clarification prompt rather than guessed at.
//!
//! CHANGELOG:
//! - 10/17/2026 - Initial implementation

use crate::contacts::resolver::{is_too_long_for_name, ResolutionResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Connective followed by the recipient. `tu` is a frequent ASR rendering of `to`.
static RECIPIENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:to|tu|tell|msg|message)\s+(?:(?:to|tu)\s+)?(\w+(?:\s+\w+)*)")
        .expect("recipient regex is valid")
});

/// Lead-in phrases collapsed to a bare "message" before matching.
const LEAD_INS: [&str; 2] = ["send a message", "send message"];

/// Recipient hint and leftover text extracted from an utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interpretation {
    /// Recipient reference, empty when no marker was found
    pub target_hint: String,
    /// Text outside the recipient phrase (the raw utterance when no marker was found)
    pub residual_text: String,
}

/// Extract the recipient hint and residual text from an utterance.
pub fn extract_target_and_body(utterance: &str) -> Interpretation {
    let mut command = utterance.to_lowercase();
    for lead_in in LEAD_INS {
        command = command.replace(lead_in, "message");
    }

    let Some(caps) = RECIPIENT_RE.captures(&command) else {
        return Interpretation {
            target_hint: String::new(),
            residual_text: utterance.trim().to_string(),
        };
    };

    let mut hint = caps.get(1).map_or("", |m| m.as_str()).trim();
    // Greedy matching can leave a filler in front of the name.
    for filler in ["to ", "tu "] {
        if let Some(rest) = hint.strip_prefix(filler) {
            hint = rest.trim_start();
        }
    }

    let whole = caps.get(0).map_or(0..0, |m| m.range());
    let residual = format!("{} {}", &command[..whole.start], &command[whole.end..]);

    Interpretation {
        target_hint: hint.to_string(),
        residual_text: tidy(&residual),
    }
}

/// Collapse whitespace and strip dangling punctuation.
fn tidy(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches(|c: char| matches!(c, ',' | '.' | ':' | ';' | '!' | '?') || c.is_whitespace())
        .to_string()
}

/// Does the utterance ask for a message to be sent?
pub fn is_send_command(utterance: &str) -> bool {
    let lower = utterance.to_lowercase();
    lower.contains("send") || lower.contains("message")
}

/// Does the utterance ask the front end to stop listening?
pub fn is_exit_command(utterance: &str) -> bool {
    let lower = utterance.to_lowercase();
    ["exit", "stop", "quit"].iter().any(|w| lower.contains(w))
}

/// Is a reply to "Say yes to send" an approval?
pub fn is_confirmation(reply: &str) -> bool {
    let lower = reply.to_lowercase();
    ["yes", "send", "okay"].iter().any(|w| lower.contains(w))
}

/// Follow-up the caller should put to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Clarification {
    /// No recipient was mentioned
    AskRecipient,
    /// The recipient slot holds what sounds like message text
    NotAName { hint: String },
    /// The recipient did not match any contact
    UnknownContact { hint: String },
    /// Several contacts fit equally well
    ChooseOne { candidates: Vec<String> },
    /// Recipient is settled but there is nothing to send
    AskMessage { recipient: String },
}

impl Clarification {
    /// Prompt text to speak or print.
    pub fn prompt(&self) -> String {
        match self {
            Clarification::AskRecipient => "Who do you want to send the message to?".to_string(),
            Clarification::NotAName { .. } => {
                "That sounds like a message, not a name. Please say just the contact name."
                    .to_string()
            }
            Clarification::UnknownContact { hint } => {
                format!("I could not find contact {}. Please say the name again.", hint)
            }
            Clarification::ChooseOne { candidates } => {
                format!("Did you mean {}?", candidates.join(" or "))
            }
            Clarification::AskMessage { recipient } => {
                format!("Found contact {}. What is the message?", recipient)
            }
        }
    }
}

/// Decide whether a hint and its resolution need a follow-up question.
pub fn clarify(target_hint: &str, result: &ResolutionResult) -> Option<Clarification> {
    let hint = target_hint.trim();
    if hint.is_empty() {
        return Some(Clarification::AskRecipient);
    }
    match result {
        ResolutionResult::Resolved { .. } => None,
        ResolutionResult::Ambiguous { candidates } => Some(Clarification::ChooseOne {
            candidates: candidates.clone(),
        }),
        ResolutionResult::NotFound if is_too_long_for_name(hint) => {
            Some(Clarification::NotAName {
                hint: hint.to_string(),
            })
        }
        ResolutionResult::NotFound => Some(Clarification::UnknownContact {
            hint: hint.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contacts::resolver::MatchKind;

    fn hint(utterance: &str) -> String {
        extract_target_and_body(utterance).target_hint
    }

    #[test]
    fn test_message_to_name() {
        assert_eq!(hint("message to alice"), "alice");
        assert_eq!(hint("Send a message to Alice Smith"), "alice smith");
        assert_eq!(hint("send message to bob"), "bob");
    }

    #[test]
    fn test_homophone_tu() {
        assert_eq!(hint("send a message tu ravi"), "ravi");
        assert_eq!(hint("send tu ravi"), "ravi");
    }

    #[test]
    fn test_tell_and_msg() {
        assert_eq!(hint("tell mom"), "mom");
        assert_eq!(hint("msg bob jones"), "bob jones");
    }

    #[test]
    fn test_leading_filler_stripped() {
        assert_eq!(hint("message to to alice"), "alice");
        assert_eq!(hint("tell tu tu alice"), "alice");
    }

    #[test]
    fn test_connective_must_be_whole_word() {
        let result = extract_target_and_body("potato salad");
        assert_eq!(result.target_hint, "");
        assert_eq!(result.residual_text, "potato salad");
    }

    #[test]
    fn test_no_marker_keeps_raw_utterance() {
        let result = extract_target_and_body("  Hello There  ");
        assert_eq!(result.target_hint, "");
        assert_eq!(result.residual_text, "Hello There");
    }

    #[test]
    fn test_residual_text() {
        let result = extract_target_and_body("please send a message to alice");
        assert_eq!(result.target_hint, "alice");
        assert_eq!(result.residual_text, "please");

        let result = extract_target_and_body("tell bob, running late");
        assert_eq!(result.target_hint, "bob");
        assert_eq!(result.residual_text, "running late");
    }

    #[test]
    fn test_command_predicates() {
        assert!(is_send_command("Send a message to Bob"));
        assert!(is_send_command("message alice"));
        assert!(!is_send_command("what time is it"));
        assert!(is_exit_command("ok stop"));
        assert!(is_confirmation("Yes please"));
        assert!(is_confirmation("okay"));
        assert!(!is_confirmation("no"));
    }

    #[test]
    fn test_clarify() {
        assert_eq!(
            clarify("", &ResolutionResult::NotFound),
            Some(Clarification::AskRecipient)
        );
        assert_eq!(
            clarify("i will be there at five", &ResolutionResult::NotFound),
            Some(Clarification::NotAName {
                hint: "i will be there at five".to_string()
            })
        );
        assert_eq!(
            clarify("zed", &ResolutionResult::NotFound),
            Some(Clarification::UnknownContact {
                hint: "zed".to_string()
            })
        );
        let resolved = ResolutionResult::Resolved {
            canonical_name: "Alice".to_string(),
            phone_identifier: "1".to_string(),
            match_kind: MatchKind::Exact,
        };
        assert_eq!(clarify("alice", &resolved), None);
    }

    #[test]
    fn test_prompts() {
        assert_eq!(
            Clarification::UnknownContact {
                hint: "zed".to_string()
            }
            .prompt(),
            "I could not find contact zed. Please say the name again."
        );
        assert!(Clarification::AskRecipient.prompt().starts_with("Who"));
        assert_eq!(
            Clarification::AskMessage {
                recipient: "Alice Smith".to_string()
            }
            .prompt(),
            "Found contact Alice Smith. What is the message?"
        );
    }
}
