//! Interpret command: show what an utterance would do without sending.
//!
//! CHANGELOG:
//! - 10/17/2026 - Initial implementation

use super::EXIT_CLARIFY;
use crate::contacts::{resolve, ContactStore, ResolutionResult};
use crate::interpreter::{self, Clarification, Interpretation};
use crate::output::OutputControls;
use anyhow::Result;
use serde::Serialize;
use std::process::ExitCode;

/// Everything the command flow would decide for an utterance.
#[derive(Debug, Serialize)]
pub struct InterpretReport {
    pub utterance: String,
    pub is_send_command: bool,
    pub is_exit_command: bool,
    #[serde(flatten)]
    pub interpretation: Interpretation,
    pub resolution: ResolutionResult,
    pub clarification: Option<Clarification>,
    pub prompt: Option<String>,
}

/// Run the interpreter and resolver over an utterance.
pub fn analyze(utterance: &str, store: &ContactStore) -> InterpretReport {
    let interpretation = interpreter::extract_target_and_body(utterance);
    let resolution = resolve(&interpretation.target_hint, store);
    let clarification = interpreter::clarify(&interpretation.target_hint, &resolution);
    let prompt = clarification.as_ref().map(Clarification::prompt);

    InterpretReport {
        utterance: utterance.to_string(),
        is_send_command: interpreter::is_send_command(utterance),
        is_exit_command: interpreter::is_exit_command(utterance),
        interpretation,
        resolution,
        clarification,
        prompt,
    }
}

pub fn interpret(store: &ContactStore, utterance: &str, output: &OutputControls) -> Result<ExitCode> {
    let report = analyze(utterance, store);

    output.report(&report, || {
        let mut lines = vec![
            format!("recipient hint: {:?}", report.interpretation.target_hint),
            format!("residual text:  {:?}", report.interpretation.residual_text),
        ];
        match &report.resolution {
            ResolutionResult::Resolved {
                canonical_name,
                phone_identifier,
                match_kind,
            } => lines.push(format!(
                "resolved:       {} ({}) [{}]",
                canonical_name, phone_identifier, match_kind
            )),
            ResolutionResult::Ambiguous { candidates } => {
                lines.push(format!("ambiguous:      {}", candidates.join(", ")))
            }
            ResolutionResult::NotFound => lines.push("resolved:       not found".to_string()),
        }
        if let Some(prompt) = &report.prompt {
            lines.push(format!("ask:            {}", prompt));
        }
        lines.join("\n")
    });

    if report.clarification.is_some() {
        Ok(ExitCode::from(EXIT_CLARIFY))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
