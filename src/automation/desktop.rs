//! Desktop automation by shelling out to platform tools.
//!
//! - macOS: `open` and osascript (System Events)
//! - Linux: `xdg-open` and xdotool
//! - Windows: `rundll32` URL handler and PowerShell with WScript.Shell
//!
//! CHANGELOG:
//! - 10/17/2026 - Initial implementation

use super::{DesktopDriver, Shortcut, WindowId};
use crate::applescript;
use anyhow::{anyhow, Context, Result};
use std::process::{Command, Output};

/// Platform whose tooling drives the desktop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Linux,
    Windows,
}

impl Platform {
    /// Platform of the running process (anything unknown is treated as Linux/X11).
    pub fn current() -> Self {
        match std::env::consts::OS {
            "macos" => Platform::MacOs,
            "windows" => Platform::Windows,
            _ => Platform::Linux,
        }
    }
}

/// [`DesktopDriver`] backed by the host's automation tools.
#[derive(Debug, Clone, Copy)]
pub struct SystemDesktop {
    platform: Platform,
}

impl SystemDesktop {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }

    pub fn current() -> Self {
        Self::new(Platform::current())
    }

    fn powershell(&self, script: &str) -> Result<String> {
        let output = run("powershell", &["-NoProfile", "-NonInteractive", "-Command", script])?;
        checked(output, "powershell")
    }

    fn xdotool(&self, args: &[&str]) -> Result<String> {
        checked(run("xdotool", args)?, "xdotool")
    }
}

impl Default for SystemDesktop {
    fn default() -> Self {
        Self::current()
    }
}

impl DesktopDriver for SystemDesktop {
    fn open_url(&self, url: &str) -> Result<()> {
        tracing::debug!(url, "opening url");
        let output = match self.platform {
            Platform::MacOs => run("open", &[url])?,
            Platform::Linux => run("xdg-open", &[url])?,
            Platform::Windows => run("rundll32", &["url.dll,FileProtocolHandler", url])?,
        };
        checked(output, "url opener").map(|_| ())
    }

    fn find_window(&self, title: &str) -> Result<Option<WindowId>> {
        match self.platform {
            Platform::MacOs => {
                let exists = applescript::run(&applescript::process_exists_script(title))?;
                Ok((exists == "true").then(|| WindowId(title.to_string())))
            }
            Platform::Linux => {
                // xdotool exits 1 when nothing matches
                let output = run("xdotool", &["search", "--onlyvisible", "--name", title])?;
                let stdout = String::from_utf8_lossy(&output.stdout);
                Ok(stdout
                    .lines()
                    .map(str::trim)
                    .find(|line| !line.is_empty())
                    .map(|id| WindowId(id.to_string())))
            }
            Platform::Windows => {
                let script = format!(
                    "(Get-Process | Where-Object {{ $_.MainWindowTitle -like '*{}*' }} | Select-Object -First 1).Id",
                    powershell_quote(title)
                );
                let pid = self.powershell(&script)?;
                Ok((!pid.is_empty()).then(|| WindowId(pid)))
            }
        }
    }

    fn focus(&self, window: &WindowId) -> Result<()> {
        match self.platform {
            Platform::MacOs => applescript::run(&applescript::activate_script(&window.0)).map(|_| ()),
            Platform::Linux => self.xdotool(&["windowactivate", "--sync", &window.0]).map(|_| ()),
            Platform::Windows => {
                let activated = self.powershell(&format!(
                    "(New-Object -ComObject WScript.Shell).AppActivate({})",
                    window.0
                ))?;
                if activated.eq_ignore_ascii_case("true") {
                    Ok(())
                } else {
                    Err(anyhow!("AppActivate could not focus window {}", window.0))
                }
            }
        }
    }

    fn shortcut(&self, _window: &WindowId, shortcut: Shortcut) -> Result<()> {
        match (self.platform, shortcut) {
            (Platform::MacOs, Shortcut::NewChat) => {
                applescript::run(&applescript::command_keystroke_script('n')).map(|_| ())
            }
            (Platform::Linux, Shortcut::NewChat) => {
                self.xdotool(&["key", "--clearmodifiers", "ctrl+n"]).map(|_| ())
            }
            (Platform::Windows, Shortcut::NewChat) => self.powershell(&send_keys_script("^n")).map(|_| ()),
        }
    }

    fn type_text(&self, _window: &WindowId, text: &str) -> Result<()> {
        match self.platform {
            Platform::MacOs => applescript::run(&applescript::keystroke_script(text)).map(|_| ()),
            Platform::Linux => self
                .xdotool(&["type", "--clearmodifiers", "--delay", "10", "--", text])
                .map(|_| ()),
            Platform::Windows => self
                .powershell(&send_keys_script(&escape_send_keys(text)))
                .map(|_| ()),
        }
    }

    fn press_enter(&self, window: Option<&WindowId>) -> Result<()> {
        match self.platform {
            Platform::MacOs => {
                applescript::run(&applescript::key_code_script(applescript::RETURN_KEY_CODE))
                    .map(|_| ())
            }
            Platform::Linux => match window {
                Some(w) => self.xdotool(&["key", "--window", &w.0, "Return"]).map(|_| ()),
                None => self.xdotool(&["key", "Return"]).map(|_| ()),
            },
            Platform::Windows => self.powershell(&send_keys_script("{ENTER}")).map(|_| ()),
        }
    }
}

fn run(program: &str, args: &[&str]) -> Result<Output> {
    Command::new(program)
        .args(args)
        .output()
        .with_context(|| format!("Failed to run {}", program))
}

fn checked(output: Output, what: &str) -> Result<String> {
    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(anyhow!("{} failed ({}): {}", what, output.status, stderr.trim()))
    }
}

/// Escape text for a PowerShell single-quoted string.
fn powershell_quote(s: &str) -> String {
    s.replace('\'', "''")
}

/// Escape SendKeys metacharacters so text is typed literally.
pub fn escape_send_keys(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '+' | '^' | '%' | '~' | '(' | ')' | '{' | '}' | '[' | ']' => {
                escaped.push('{');
                escaped.push(c);
                escaped.push('}');
            }
            '\n' => escaped.push_str("+{ENTER}"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn send_keys_script(keys: &str) -> String {
    format!(
        "(New-Object -ComObject WScript.Shell).SendKeys('{}')",
        powershell_quote(keys)
    )
}
