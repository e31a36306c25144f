//! AppleScript execution for driving the WhatsApp desktop client on macOS.
//!
//! Uses osascript to talk to System Events (keystrokes) and the client itself
//! (activation).
//!
//! CHANGELOG:
//! - 10/17/2026 - Replaced Messages.app send with System Events keystroke scripts
//! - 01/10/2026 - Initial implementation

use anyhow::{anyhow, Context, Result};
use std::process::Command;

/// Key code for Return in System Events.
pub const RETURN_KEY_CODE: u8 = 36;

/// Escape a string for safe inclusion in AppleScript.
///
/// CRITICAL: Order matters!
/// 1. Escape backslashes FIRST
/// 2. Then escape quotes
///
/// This prevents injection attacks where user data breaks the string context.
pub fn escape_applescript_string(s: &str) -> String {
    s.replace('\\', "\\\\") // Backslashes FIRST
        .replace('"', "\\\"") // Then quotes
}

/// Script returning "true"/"false" for whether a process is running.
pub fn process_exists_script(process: &str) -> String {
    format!(
        r#"tell application "System Events" to return (exists process "{}")"#,
        escape_applescript_string(process)
    )
}

/// Script bringing an application to the front.
pub fn activate_script(app: &str) -> String {
    format!(
        r#"tell application "{}" to activate"#,
        escape_applescript_string(app)
    )
}

/// Script typing text into the frontmost application.
pub fn keystroke_script(text: &str) -> String {
    format!(
        r#"tell application "System Events" to keystroke "{}""#,
        escape_applescript_string(text)
    )
}

/// Script typing a key with the command modifier held.
pub fn command_keystroke_script(key: char) -> String {
    format!(
        r#"tell application "System Events" to keystroke "{}" using command down"#,
        escape_applescript_string(&key.to_string())
    )
}

/// Script pressing a raw key code.
pub fn key_code_script(code: u8) -> String {
    format!(r#"tell application "System Events" to key code {}"#, code)
}

/// Run a script through osascript and return its trimmed stdout.
pub fn run(script: &str) -> Result<String> {
    let output = Command::new("osascript")
        .arg("-e")
        .arg(script)
        .output()
        .context("Failed to run osascript")?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(anyhow!("AppleScript failed: {}", stderr.trim()))
    }
}
